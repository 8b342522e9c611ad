// ── Entity instance state machine ──
//
// One configuration plus its local identifier. `Absent` and `Present` are
// the only observable states; the identifier is the whole of the state.
// Methods take `&mut self`, so at most one operation is in flight per
// instance.

use soliddns_api::Transport;
use strum::Display;
use tracing::debug;

use crate::descriptor::EntityDescriptor;
use crate::engine::Reconciler;
use crate::error::CoreError;
use crate::model::{EntityConfig, LocalId, Operation, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EntityState {
    Absent,
    Present,
}

/// A managed object: its descriptor, configuration and local identifier.
#[derive(Debug, Clone)]
pub struct EntityInstance {
    descriptor: &'static EntityDescriptor,
    config: EntityConfig,
    id: LocalId,
}

impl EntityInstance {
    /// A not-yet-created object.
    pub fn new(descriptor: &'static EntityDescriptor, config: EntityConfig) -> Self {
        Self {
            descriptor,
            config,
            id: LocalId::empty(),
        }
    }

    /// An object known by an identifier from a previous run.
    pub fn existing(
        descriptor: &'static EntityDescriptor,
        id: impl Into<LocalId>,
        config: EntityConfig,
    ) -> Self {
        Self {
            descriptor,
            config,
            id: id.into(),
        }
    }

    pub fn state(&self) -> EntityState {
        if self.id.is_empty() {
            EntityState::Absent
        } else {
            EntityState::Present
        }
    }

    pub fn id(&self) -> &LocalId {
        &self.id
    }

    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    pub fn display_name(&self) -> String {
        self.descriptor.display_name(&self.config)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// `Absent -> Present`.
    pub async fn create<T: Transport>(
        &mut self,
        reconciler: &Reconciler<T>,
    ) -> Result<&LocalId, CoreError> {
        self.require(EntityState::Absent, Operation::Create)?;
        self.id = reconciler.create(self.descriptor, &self.config).await?;
        Ok(&self.id)
    }

    /// `Present -> Present | Absent`. Returns whether the object still
    /// exists. Reading an absent instance sends nothing.
    pub async fn read<T: Transport>(
        &mut self,
        reconciler: &Reconciler<T>,
    ) -> Result<bool, CoreError> {
        if self.state() == EntityState::Absent {
            return Ok(false);
        }

        let outcome = reconciler
            .read_record(self.descriptor, &self.id, &self.config)
            .await?;
        if let Outcome::Found(record) = &outcome {
            self.config = self.descriptor.refresh(&self.config, record);
        }
        self.settle(Operation::Read, &outcome);
        Ok(self.state() == EntityState::Present)
    }

    /// `Present -> Present`, adopting `next` on success.
    ///
    /// A change to any force-replace field is refused with
    /// `RequiresReplacement`; the host must delete and create instead.
    pub async fn update<T: Transport>(
        &mut self,
        reconciler: &Reconciler<T>,
        next: EntityConfig,
    ) -> Result<&LocalId, CoreError> {
        self.require(EntityState::Present, Operation::Update)?;

        let changed = self.descriptor.replacement_fields(&self.config, &next);
        if !changed.is_empty() {
            return Err(CoreError::RequiresReplacement {
                entity: self.display_name(),
                fields: changed.into_iter().map(str::to_owned).collect(),
            });
        }

        let id = reconciler.update(self.descriptor, &self.id, &next).await?;
        self.id = id;
        self.config = next;
        Ok(&self.id)
    }

    /// `Present -> Absent`. Deleting an absent instance is a no-op.
    ///
    /// An appliance refusal still drops the identifier and comes back as
    /// `Ok(Outcome::Failed)`.
    pub async fn delete<T: Transport>(
        &mut self,
        reconciler: &Reconciler<T>,
    ) -> Result<Outcome, CoreError> {
        if self.state() == EntityState::Absent {
            debug!(entity = %self.display_name(), "already absent");
            return Ok(Outcome::Deleted);
        }

        let outcome = reconciler
            .delete(self.descriptor, &self.id, &self.config)
            .await?;
        self.settle(Operation::Delete, &outcome);
        Ok(outcome)
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn require(&self, expected: EntityState, op: Operation) -> Result<(), CoreError> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidState {
                entity: self.display_name(),
                operation: op.to_string(),
                state: state.to_string(),
            })
        }
    }

    fn settle(&mut self, op: Operation, outcome: &Outcome) {
        if op.clear_policy().is_some_and(|p| p.clears(outcome)) {
            self.id.clear();
        }
    }
}
