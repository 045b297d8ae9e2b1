//! Store-level settings, under `/store`.

use reqwest::Method;

use crate::classify::ApiOutcome;
use crate::client::AdminClient;
use crate::error::Result;
use crate::resources::StoreSettings;

impl AdminClient {
    /// Fetch the store settings
    pub async fn get_store(&self) -> Result<ApiOutcome<StoreSettings>> {
        self.request(Method::GET, "/store", &[], None::<&()>).await
    }
}
