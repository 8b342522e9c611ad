// ── Reconciliation engine ──
//
// The host boundary: create, read, update and delete for any registered
// entity type. A `Reconciler` holds only its transport and immutable
// options, so one instance can serve many concurrent tasks. Local state
// (the stored identifier) belongs to the caller; see `EntityInstance`.

use soliddns_api::{FormParams, RawResponse, Transport, Verb};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::descriptor::EntityDescriptor;
use crate::error::CoreError;
use crate::interpret::interpret;
use crate::model::{EntityConfig, LocalId, Operation, Outcome};
use crate::params;
use crate::resolve::{ResolvedChain, Resolver};

/// Engine tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// HTTP statuses that mean "try again later" rather than an answer.
    ///
    /// On read and delete a response with one of these statuses fails with
    /// `CoreError::Unavailable` and never clears the local identifier.
    pub retryable_statuses: Vec<u16>,
}

impl ReconcileOptions {
    /// 502, 503 and 504.
    pub fn gateway_errors() -> Self {
        Self {
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

/// Result of a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    /// The configuration refreshed from the appliance, or the input
    /// configuration when the object was not found.
    pub config: EntityConfig,
    /// `false` means the object no longer exists and the caller must drop
    /// its identifier.
    pub found: bool,
}

/// Stateless reconciliation engine over a `Transport`.
pub struct Reconciler<T> {
    transport: T,
    options: ReconcileOptions,
}

impl<T: Transport> Reconciler<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ReconcileOptions::default())
    }

    pub fn with_options(transport: T, options: ReconcileOptions) -> Self {
        Self { transport, options }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    // ── Lifecycle operations ─────────────────────────────────────────

    /// Create the object and return the identifier the appliance assigned.
    pub async fn create(
        &self,
        desc: &EntityDescriptor,
        config: &EntityConfig,
    ) -> Result<LocalId, CoreError> {
        let entity = desc.display_name(config);
        let span = info_span!("creating", resource = desc.resource, entity = %entity);

        async {
            params::validate(desc, config)?;
            let chain = Resolver::new(&self.transport)
                .resolve_chain(desc, config)
                .await?;
            let params = params::build(Operation::Create, desc, config, &chain, &LocalId::empty())?;

            let ep = desc.create;
            let resp = self.send(&entity, ep.verb, ep.path, &params).await?;

            match decode(&entity, Operation::Create, &resp, ep.success)? {
                Outcome::Created(id) => {
                    info!(id = %id, "created");
                    Ok(LocalId::new(id))
                }
                other => Err(rejected(entity.clone(), resp.status, other)),
            }
        }
        .instrument(span)
        .await
    }

    /// Read the object behind `id` and return the raw interpretation:
    /// `Found(record)` or `NotFound`.
    pub async fn read_record(
        &self,
        desc: &EntityDescriptor,
        id: &LocalId,
        config: &EntityConfig,
    ) -> Result<Outcome, CoreError> {
        let entity = desc.display_name(config);
        let span = info_span!("reading", resource = desc.resource, entity = %entity, id = %id);

        async {
            let chain = Resolver::new(&self.transport)
                .resolve_chain(desc, config)
                .await?;
            let params = params::build(Operation::Read, desc, config, &chain, id)?;

            let ep = desc.read;
            let resp = self.send(&entity, Verb::Get, ep.path, &params).await?;
            self.check_retryable(&entity, &resp)?;

            let outcome = decode(&entity, Operation::Read, &resp, ep.success)?;
            if outcome == Outcome::NotFound {
                info!(status = resp.status, "not found on appliance");
            }
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    /// Read the object behind `id`, refreshing `config` from the record.
    pub async fn read(
        &self,
        desc: &EntityDescriptor,
        id: &LocalId,
        config: &EntityConfig,
    ) -> Result<ReadResult, CoreError> {
        Ok(match self.read_record(desc, id, config).await? {
            Outcome::Found(record) => ReadResult {
                config: desc.refresh(config, &record),
                found: true,
            },
            _ => ReadResult {
                config: config.clone(),
                found: false,
            },
        })
    }

    /// Push the mutable fields of `config` to the object behind `id`.
    ///
    /// Force-replace fields are never sent. Deciding whether they changed
    /// needs the prior configuration; `EntityInstance::update` does that.
    pub async fn update(
        &self,
        desc: &EntityDescriptor,
        id: &LocalId,
        config: &EntityConfig,
    ) -> Result<LocalId, CoreError> {
        let entity = desc.display_name(config);
        let Some(ep) = desc.update else {
            return Err(CoreError::Unsupported {
                entity,
                operation: Operation::Update.to_string(),
            });
        };
        let span = info_span!("updating", resource = desc.resource, entity = %entity, id = %id);

        async {
            params::validate(desc, config)?;
            let chain = Resolver::new(&self.transport)
                .resolve_chain(desc, config)
                .await?;
            let params = params::build(Operation::Update, desc, config, &chain, id)?;

            let resp = self.send(&entity, ep.verb, ep.path, &params).await?;

            match decode(&entity, Operation::Update, &resp, ep.success)? {
                Outcome::Updated(id) => {
                    info!(id = %id, "updated");
                    Ok(LocalId::new(id))
                }
                other => Err(rejected(entity.clone(), resp.status, other)),
            }
        }
        .instrument(span)
        .await
    }

    /// Delete the object behind `id`.
    ///
    /// Returns `Deleted` or `Failed(reason)`. Both mean the caller drops its
    /// identifier; only an `Err` leaves it in place. `config` is used for
    /// messages only.
    pub async fn delete(
        &self,
        desc: &EntityDescriptor,
        id: &LocalId,
        config: &EntityConfig,
    ) -> Result<Outcome, CoreError> {
        let entity = desc.display_name(config);
        let span = info_span!("deleting", resource = desc.resource, entity = %entity, id = %id);

        async {
            let params = params::build(Operation::Delete, desc, config, &ResolvedChain::new(), id)?;

            let ep = desc.delete;
            let resp = self.send(&entity, ep.verb, ep.path, &params).await?;
            self.check_retryable(&entity, &resp)?;

            let outcome = decode(&entity, Operation::Delete, &resp, ep.success)?;
            match &outcome {
                Outcome::Failed(reason) => {
                    warn!(
                        status = resp.status,
                        reason = %reason,
                        "appliance refused delete, dropping local identifier"
                    );
                }
                _ => info!("deleted"),
            }
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn send(
        &self,
        entity: &str,
        verb: Verb,
        endpoint: &str,
        params: &FormParams,
    ) -> Result<RawResponse, CoreError> {
        debug!(%verb, endpoint, "sending");
        let resp = self
            .transport
            .request(verb, endpoint, params)
            .await
            .map_err(|e| CoreError::transport(entity, e))?;
        debug!(status = resp.status, "received");
        Ok(resp)
    }

    fn check_retryable(&self, entity: &str, resp: &RawResponse) -> Result<(), CoreError> {
        if self.options.retryable_statuses.contains(&resp.status) {
            return Err(CoreError::Unavailable {
                entity: entity.to_owned(),
                status: resp.status,
            });
        }
        Ok(())
    }
}

fn decode(
    entity: &str,
    op: Operation,
    resp: &RawResponse,
    expected: &[u16],
) -> Result<Outcome, CoreError> {
    interpret(op, resp.status, &resp.body, expected).map_err(|e| CoreError::Decode {
        entity: entity.to_owned(),
        message: e.to_string(),
    })
}

fn rejected(entity: String, status: u16, outcome: Outcome) -> CoreError {
    let message = match outcome {
        Outcome::Failed(reason) => reason,
        other => format!("unexpected outcome {other:?}"),
    };
    CoreError::RemoteRejected {
        entity,
        status,
        message,
    }
}
