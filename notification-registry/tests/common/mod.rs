use notification_registry::config::{DeliveryConfig, NotificationConfig};
use notification_registry::services::NotificationStore;
use notification_registry::startup::Application;
use service_core::config::Config as CoreConfig;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: NotificationStore,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(DeliveryConfig::default()).await
    }

    pub async fn spawn_with(delivery: DeliveryConfig) -> Self {
        // Use random port for testing (port 0)
        let config = NotificationConfig {
            common: CoreConfig { port: 0 },
            delivery,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub async fn create(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/notifications", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn create_raw(&self, body: &'static str) -> reqwest::Response {
        self.client
            .post(format!("{}/notifications", self.address))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
