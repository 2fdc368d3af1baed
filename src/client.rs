// 🌐 Persistence Client - talks to the instance API
//
// Every call carries the credential as the `password` query parameter.
// Calls are blocking and sequential; nothing here retries or times out.

use crate::errors::ClientError;
use crate::instance::InstanceSummary;
use serde_json::Value;

/// Default API location
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// The three operations the gateway exposes
pub trait InstanceApi {
    fn list_instances(&self, password: &str) -> Result<Vec<InstanceSummary>, ClientError>;

    /// Raw stored blob for one instance
    fn fetch_instance(&self, id: i64, password: &str) -> Result<Value, ClientError>;

    /// Overwrite one instance's blob
    fn put_instance(&self, id: i64, password: &str, data: &Value) -> Result<(), ClientError>;
}

#[cfg(feature = "client")]
pub use transport::HttpInstanceApi;

#[cfg(feature = "client")]
mod transport {
    use super::*;
    use tracing::{debug, warn};

    pub struct HttpInstanceApi {
        agent: ureq::Agent,
        base_url: String,
    }

    impl HttpInstanceApi {
        pub fn new(base_url: impl Into<String>) -> Self {
            let base_url = base_url.into().trim_end_matches('/').to_string();
            Self {
                agent: ureq::Agent::new_with_defaults(),
                base_url,
            }
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        fn url(&self, path: &str) -> String {
            format!("{}/api{}", self.base_url, path)
        }
    }

    fn map_error(err: ureq::Error) -> ClientError {
        match err {
            ureq::Error::StatusCode(401) => {
                warn!("instance API rejected the credential");
                ClientError::Unauthorized
            }
            ureq::Error::StatusCode(code) => ClientError::Status(code),
            other => ClientError::Transport(other.to_string()),
        }
    }

    impl InstanceApi for HttpInstanceApi {
        fn list_instances(&self, password: &str) -> Result<Vec<InstanceSummary>, ClientError> {
            let url = self.url("/instances");
            debug!(%url, "listing instances");

            let mut response = self
                .agent
                .get(&url)
                .query("password", password)
                .call()
                .map_err(map_error)?;

            response
                .body_mut()
                .read_json::<Vec<InstanceSummary>>()
                .map_err(|err| ClientError::Decode(err.to_string()))
        }

        fn fetch_instance(&self, id: i64, password: &str) -> Result<Value, ClientError> {
            let url = self.url(&format!("/instance/{}", id));
            debug!(%url, "fetching instance");

            let mut response = self
                .agent
                .get(&url)
                .query("password", password)
                .call()
                .map_err(map_error)?;

            response
                .body_mut()
                .read_json::<Value>()
                .map_err(|err| ClientError::Decode(err.to_string()))
        }

        fn put_instance(&self, id: i64, password: &str, data: &Value) -> Result<(), ClientError> {
            let url = self.url(&format!("/instance/{}", id));
            debug!(%url, "updating instance");

            self.agent
                .put(&url)
                .query("password", password)
                .send_json(data)
                .map_err(map_error)?;

            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_url_building() {
            let api = HttpInstanceApi::new("http://localhost:3000/");
            assert_eq!(api.base_url(), "http://localhost:3000");
            assert_eq!(api.url("/instances"), "http://localhost:3000/api/instances");
            assert_eq!(api.url("/instance/7"), "http://localhost:3000/api/instance/7");
        }

        #[test]
        fn test_status_mapping() {
            assert!(map_error(ureq::Error::StatusCode(401)).is_unauthorized());
            assert!(matches!(
                map_error(ureq::Error::StatusCode(404)),
                ClientError::Status(404)
            ));
        }
    }
}
