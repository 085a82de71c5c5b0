//! Login-capable entity kinds.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::Role;
use crate::model::{Admin, Business, DeliveryDriver, User};
use crate::service::{PrincipalService, Services};

/// An entity that can log in and receive a token.
///
/// Every principal kind has its own id namespace and its own breaker.
pub trait Principal: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Role claim minted for this kind.
    const ROLE: Role;

    /// Breaker (dependency) name.
    const DEPENDENCY: &'static str;

    /// Key the entity sits under in the login body.
    const BODY_KEY: &'static str;

    /// Query parameter carrying the identifier.
    const ID_PARAM: &'static str;

    fn id(&self) -> &str;

    fn password(&self) -> &str;

    /// The service backing this kind.
    fn service(services: &Services) -> Arc<dyn PrincipalService<Self>>;
}

impl Principal for Admin {
    const ROLE: Role = Role::Admin;
    const DEPENDENCY: &'static str = "admin";
    const BODY_KEY: &'static str = "admin";
    const ID_PARAM: &'static str = "adminId";

    fn id(&self) -> &str {
        &self.admin_id
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn service(services: &Services) -> Arc<dyn PrincipalService<Self>> {
        services.admins.clone()
    }
}

impl Principal for Business {
    const ROLE: Role = Role::Business;
    const DEPENDENCY: &'static str = "business";
    const BODY_KEY: &'static str = "business";
    const ID_PARAM: &'static str = "businessId";

    fn id(&self) -> &str {
        &self.business_id
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn service(services: &Services) -> Arc<dyn PrincipalService<Self>> {
        services.businesses.clone()
    }
}

impl Principal for DeliveryDriver {
    const ROLE: Role = Role::DeliveryDriver;
    const DEPENDENCY: &'static str = "delivery_driver";
    const BODY_KEY: &'static str = "driver";
    const ID_PARAM: &'static str = "deliveryDriverId";

    fn id(&self) -> &str {
        &self.delivery_driver_id
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn service(services: &Services) -> Arc<dyn PrincipalService<Self>> {
        services.drivers.clone()
    }
}

impl Principal for User {
    const ROLE: Role = Role::User;
    const DEPENDENCY: &'static str = "user";
    const BODY_KEY: &'static str = "user";
    const ID_PARAM: &'static str = "userId";

    fn id(&self) -> &str {
        &self.user_id
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn service(services: &Services) -> Arc<dyn PrincipalService<Self>> {
        services.users.clone()
    }
}
