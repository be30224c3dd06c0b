//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use bella_app::auth::Authenticated;

/// Typed access to what middleware leaves in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_authenticated(&mut self, authenticated: Authenticated);

    /// The caller resolved by the auth middleware. Routes mounted without
    /// the middleware get a 401.
    fn authenticated_or_401(&self) -> Result<&Authenticated, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_authenticated(&mut self, authenticated: Authenticated) {
        self.inject(authenticated);
    }

    fn authenticated_or_401(&self) -> Result<&Authenticated, StatusError> {
        self.obtain::<Authenticated>()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
