use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;

/// Login-capable kinds and where their routes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    Admin,
    Business,
    Driver,
    User,
}

impl PrincipalKind {
    fn login_path(self) -> &'static str {
        match self {
            PrincipalKind::Admin => "/AdminController/getAdminByIdByPass",
            PrincipalKind::Business => "/BusinessController/getBusinessByIdByPass",
            PrincipalKind::Driver => "/DeliveryDriverController/getDriverByIdByPass",
            PrincipalKind::User => "/UserController/getUserByIdByPass",
        }
    }

    fn id_param(self) -> &'static str {
        match self {
            PrincipalKind::Admin => "adminId",
            PrincipalKind::Business => "businessId",
            PrincipalKind::Driver => "deliveryDriverId",
            PrincipalKind::User => "userId",
        }
    }

    /// Key the entity sits under in a login response.
    pub fn body_key(self) -> &'static str {
        match self {
            PrincipalKind::Admin => "admin",
            PrincipalKind::Business => "business",
            PrincipalKind::Driver => "driver",
            PrincipalKind::User => "user",
        }
    }
}

/// Status plus decoded JSON body (absent for 204 and empty bodies).
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
}

impl Reply {
    /// Bearer token from a login response.
    pub fn token(&self) -> Option<&str> {
        self.body.as_ref()?.get("token")?.as_str()
    }
}

pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder()
                .pool_max_idle_per_host(0)
                .no_proxy()
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Reply, reqwest::Error> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        Self::read(resp).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Reply, reqwest::Error> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::read(resp).await
    }

    /// POST with query parameters and no body.
    pub async fn post_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Reply, reqwest::Error> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        Self::read(resp).await
    }

    pub async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<Reply, reqwest::Error> {
        let resp = self
            .client
            .delete(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        Self::read(resp).await
    }

    /// Log in and return the gateway's reply (entity plus token on 200).
    pub async fn login(&self, kind: PrincipalKind, id: &str, password: &str) -> Result<Reply, reqwest::Error> {
        self.get(kind.login_path(), &[(kind.id_param(), id), ("password", password)])
            .await
    }

    async fn read(resp: Response) -> Result<Reply, reqwest::Error> {
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;
        let body = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };
        Ok(Reply { status, body })
    }
}
