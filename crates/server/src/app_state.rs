use relay_api::ApiContext;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
}
