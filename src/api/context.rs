use std::sync::Arc;

use crate::upstream::UpstreamClient;


/// The context that is accessible to every resolver in our API. Created per
/// request; the upstream client and its connection pool are shared.
pub(crate) struct Context {
    pub(crate) upstream: Arc<UpstreamClient>,
}

impl juniper::Context for Context {}
