use std::sync::Arc;

use librus_http::{HttpClient, HttpTransport};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{
    AccountInfo, Color, Grade, GradeCategory, Lesson, Notice, Reference, Subject, User,
};
use crate::resolver::{EntityGraph, Resolvable, Resolver};
use crate::session::Session;
use crate::timetable::Timetables;

/// Entry point: one session plus one cache per entity type.
///
/// Share it behind an `Arc` if several tasks need it; every method takes
/// `&self`.
#[derive(Debug)]
pub struct LibrusClient {
    config: Arc<ClientConfig>,
    session: Session,
    graph: EntityGraph,
}

impl LibrusClient {
    /// Client with default configuration and the `reqwest` transport.
    ///
    /// # Errors
    /// Returns an error if the transport cannot be built.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::default())
    }

    /// # Errors
    /// [`ClientError::Config`] if `config` does not validate, or an HTTP error
    /// if the transport cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpClient::with_config(config.http.clone())?;
        Ok(Self::assemble(config, Arc::new(transport)))
    }

    /// Client over a caller-supplied transport.
    ///
    /// # Errors
    /// [`ClientError::Config`] if `config` does not validate.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self::assemble(config, transport))
    }

    fn assemble(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let config = Arc::new(config);
        Self {
            session: Session::new(transport, Arc::clone(&config)),
            config,
            graph: EntityGraph::default(),
        }
    }

    /// # Errors
    /// See [`Session::login`].
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        self.session.login(email, password).await
    }

    /// # Errors
    /// See [`Session::refresh_token`].
    pub async fn refresh_token(&self) -> Result<(), ClientError> {
        self.session.refresh_token().await
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    #[must_use]
    pub fn account(&self) -> Option<AccountInfo> {
        self.session.account()
    }

    #[must_use]
    pub fn resolver<E: Resolvable>(&self) -> Resolver<'_, E> {
        Resolver::new(self)
    }

    #[must_use]
    pub fn users(&self) -> Resolver<'_, User> {
        self.resolver()
    }

    #[must_use]
    pub fn subjects(&self) -> Resolver<'_, Subject> {
        self.resolver()
    }

    #[must_use]
    pub fn colors(&self) -> Resolver<'_, Color> {
        self.resolver()
    }

    #[must_use]
    pub fn grade_categories(&self) -> Resolver<'_, GradeCategory> {
        self.resolver()
    }

    #[must_use]
    pub fn grades(&self) -> Resolver<'_, Grade> {
        self.resolver()
    }

    #[must_use]
    pub fn lessons(&self) -> Resolver<'_, Lesson> {
        self.resolver()
    }

    #[must_use]
    pub fn notices(&self) -> Resolver<'_, Notice> {
        self.resolver()
    }

    #[must_use]
    pub fn timetables(&self) -> Timetables<'_> {
        Timetables::new(self)
    }

    /// Follow a reference, fetching the target on a cache miss.
    ///
    /// # Errors
    /// See [`Resolver::fetch`].
    pub async fn resolve<E: Resolvable>(
        &self,
        reference: &Reference<E>,
    ) -> Result<Arc<E>, ClientError> {
        self.resolver::<E>().fetch(reference.id().clone()).await
    }

    /// Follow a reference through the cache only.
    ///
    /// # Errors
    /// [`ClientError::NotFoundInCache`] if the target was never fetched.
    pub fn cached<E: Resolvable>(&self, reference: &Reference<E>) -> Result<Arc<E>, ClientError> {
        self.resolver::<E>().get_cached(reference.id())
    }
}
