//! Guarded dispatch of downstream calls.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::Instrument;

use crate::auth::{AuthError, TokenSigner};
use crate::config::GatewayConfig;
use crate::gateway::outcome::{Domain, Fallback, GatewayError, Login};
use crate::observability::metrics;
use crate::resilience::timeouts::with_deadline;
use crate::resilience::{BreakerRegistry, CallError};
use crate::service::{Principal, ServiceError, ServiceResult, Services};

/// Per-endpoint orchestration shared by every route handler.
#[derive(Clone)]
pub struct Gateway {
    registry: Arc<BreakerRegistry>,
    signer: Arc<TokenSigner>,
    services: Arc<Services>,
    downstream_timeout: Duration,
}

impl Gateway {
    pub fn new(
        registry: Arc<BreakerRegistry>,
        signer: TokenSigner,
        services: Services,
        downstream_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            signer: Arc::new(signer),
            services: Arc::new(services),
            downstream_timeout,
        }
    }

    /// Build the registry and signer from configuration.
    pub fn from_config(config: &GatewayConfig, services: Services) -> Result<Self, AuthError> {
        Ok(Self::new(
            Arc::new(BreakerRegistry::new(config.breaker.clone())),
            TokenSigner::from_config(&config.auth)?,
            services,
            config.timeouts.downstream(),
        ))
    }

    pub fn registry(&self) -> &Arc<BreakerRegistry> {
        &self.registry
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Invoke `work` through the breaker named `dependency`.
    ///
    /// `work` runs on its own task under the downstream deadline and always
    /// completes, even if the caller goes away. A `Duplicate` it reports is
    /// turned into `Domain::Conflict` before the breaker sees the result.
    pub async fn guard<T, F, Fut>(&self, dependency: &'static str, work: F) -> Result<Domain<T>, Fallback>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Services>) -> Fut + Send + 'static,
        Fut: Future<Output = ServiceResult<Domain<T>>> + Send + 'static,
    {
        let start = Instant::now();
        let breaker = self.registry.get(dependency);
        let services = Arc::clone(&self.services);
        let deadline = self.downstream_timeout;

        let task = tokio::spawn(
            async move {
                breaker
                    .call(|| async move {
                        match with_deadline(deadline, work(services)).await {
                            Err(ServiceError::Duplicate(key)) => Ok(Domain::Conflict(key)),
                            other => other,
                        }
                    })
                    .await
            }
            .in_current_span(),
        );

        let result = match task.await {
            Ok(result) => result,
            // The permit was dropped while unwinding, so the breaker already
            // counted this as a failure.
            Err(e) => Err(CallError::Failed(ServiceError::Internal(e.to_string()))),
        };

        match result {
            Ok(domain) => {
                metrics::record_downstream_duration(dependency, start);
                metrics::record_request(dependency, domain.label());
                Ok(domain)
            }
            Err(CallError::Open(_)) => {
                tracing::warn!(dependency, "Circuit open, serving fallback");
                Self::fallback(Fallback::BreakerOpen { dependency })
            }
            Err(CallError::Failed(source)) => {
                metrics::record_downstream_duration(dependency, start);
                tracing::error!(dependency, error = %source, "Downstream call failed, serving fallback");
                Self::fallback(Fallback::Infrastructure { dependency, source })
            }
        }
    }

    fn fallback<T>(fallback: Fallback) -> Result<Domain<T>, Fallback> {
        metrics::record_request(fallback.dependency(), fallback.cause());
        metrics::record_fallback(fallback.dependency(), fallback.cause());
        Err(fallback)
    }

    /// Authenticate a principal of kind `P` and mint its token.
    ///
    /// Only the lookup goes through the breaker; signing happens after the
    /// guarded call and a signing failure is not a dependency failure.
    pub async fn login<P: Principal>(&self, id: String, password: String) -> Result<Domain<Login<P>>, GatewayError> {
        let found = self
            .guard(P::DEPENDENCY, move |services| async move {
                P::service(&services)
                    .find_by_credential(&id, &password)
                    .await
                    .map(Domain::from_option)
            })
            .await?;

        let login = found.try_map(|principal| {
            let token = self.signer.issue(principal.id(), P::ROLE)?;
            metrics::record_token_issued(P::ROLE.as_str());
            tracing::debug!(subject = %principal.id(), role = %P::ROLE, "Token issued");
            Ok::<_, AuthError>(Login { principal, token })
        })?;

        Ok(login)
    }
}
