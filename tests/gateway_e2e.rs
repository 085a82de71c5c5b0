//! End-to-end behaviour of the entity routes.

use gateway_sdk::PrincipalKind;
use order_gateway::auth::{Role, TokenSigner};
use order_gateway::config::BreakerConfig;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_register_duplicate_and_missing_user() {
    let gw = common::start_gateway(common::test_config(BreakerConfig::default())).await;

    let user = json!({ "userId": "u1", "password": "secret", "userName": "Ada" });
    let saved = gw.client.post("/UserController/saveUser", &user).await.unwrap();
    assert_eq!(saved.status, 200);
    assert_eq!(saved.body.as_ref().unwrap()["userId"], "u1");
    assert_eq!(saved.body.as_ref().unwrap()["userName"], "Ada");

    let dup = gw.client.post("/UserController/saveUser", &user).await.unwrap();
    assert_eq!(dup.status, 409);

    let snapshot = gw.running.gateway.registry().get("user").snapshot();
    assert_eq!(snapshot.consecutive_failures, 0);
    assert_eq!(snapshot.window_failures, 0);

    let ghost = gw.client.login(PrincipalKind::User, "ghost", "secret").await.unwrap();
    assert_eq!(ghost.status, 404);

    let wrong_password = gw.client.login(PrincipalKind::User, "u1", "nope").await.unwrap();
    assert_eq!(wrong_password.status, 404);

    gw.stop().await;
}

#[tokio::test]
async fn test_login_issues_role_bound_token_for_every_kind() {
    let gw = common::start_gateway(common::test_config(BreakerConfig::default())).await;
    let verifier = TokenSigner::new(common::SECRET.as_bytes(), None).unwrap();

    let cases = [
        (PrincipalKind::Admin, "/AdminController/saveAdmin", "adminId", "a1", Role::Admin),
        (PrincipalKind::Business, "/BusinessController/saveBusiness", "businessId", "b1", Role::Business),
        (PrincipalKind::Driver, "/DeliveryDriverController/saveDriver", "deliveryDriverId", "d1", Role::DeliveryDriver),
        (PrincipalKind::User, "/UserController/saveUser", "userId", "u1", Role::User),
    ];

    for (kind, save_path, id_key, id, role) in cases {
        let entity = json!({ id_key: id, "password": "pw" });
        assert_eq!(gw.client.post(save_path, &entity).await.unwrap().status, 200);

        let login = gw.client.login(kind, id, "pw").await.unwrap();
        assert_eq!(login.status, 200, "{kind:?}");
        assert_eq!(login.body.as_ref().unwrap()[kind.body_key()][id_key], id);

        let claims = verifier.verify(login.token().unwrap()).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, role);
        assert!(verifier.authorize(login.token().unwrap(), role).is_ok());
    }

    // Identifier namespaces are separate per kind.
    let cross = gw.client.login(PrincipalKind::Admin, "u1", "pw").await.unwrap();
    assert_eq!(cross.status, 404);

    gw.stop().await;
}

#[tokio::test]
async fn test_exists_routes() {
    let gw = common::start_gateway(common::test_config(BreakerConfig::default())).await;
    gw.client
        .post("/BusinessController/saveBusiness", &json!({ "businessId": "b1", "password": "pw", "orderTypeId": 3 }))
        .await
        .unwrap();
    gw.client
        .post("/AdminController/saveAdmin", &json!({ "adminId": "a1", "password": "pw" }))
        .await
        .unwrap();

    let admin = gw.client.get("/AdminController/getAdminExistsById", &[("adminId", "a1")]).await.unwrap();
    assert_eq!(admin.body, Some(json!(true)));

    let business = gw.client.get("/BusinessController/getBusinessExistsById", &[("businessId", "b1")]).await.unwrap();
    assert_eq!(business.status, 200);
    assert_eq!(business.body.unwrap()["orderTypeId"], 3);

    let no_business = gw.client.get("/BusinessController/getBusinessExistsById", &[("businessId", "b9")]).await.unwrap();
    assert_eq!(no_business.status, 404);

    let by_type = gw.client.post_query("/BusinessController/listBusinessByOrderTypeId", &[("orderTypeId", "3")]).await.unwrap();
    assert_eq!(by_type.body.unwrap().as_array().unwrap().len(), 1);

    let all = gw.client.get("/BusinessController/getAllBusinesses", &[]).await.unwrap();
    assert_eq!(all.body.unwrap().as_array().unwrap().len(), 1);

    gw.stop().await;
}

#[tokio::test]
async fn test_order_lifecycle() {
    let gw = common::start_gateway(common::test_config(BreakerConfig::default())).await;

    for (id, date, state) in [("o1", "2024-05-01T10:00:00", 0), ("o2", "2024-05-03T10:00:00", 1)] {
        let order = json!({
            "orderId": id,
            "userId": "u1",
            "businessId": "b1",
            "driverId": "d1",
            "orderDate": date,
            "orderState": state
        });
        assert_eq!(gw.client.post("/OrderController/saveOrder", &order).await.unwrap().status, 200);
    }

    let between = gw
        .client
        .get(
            "/OrderController/listOrderByDateBetween",
            &[("start", "2024-05-01T00:00:00"), ("end", "2024-05-02T00:00:00")],
        )
        .await
        .unwrap();
    let ids: Vec<Value> = between.body.unwrap().as_array().unwrap().iter().map(|o| o["orderId"].clone()).collect();
    assert_eq!(ids, vec![json!("o1")]);

    let shipped = gw.client.get("/OrderController/listOrderByState", &[("orderState", "1")]).await.unwrap();
    assert_eq!(shipped.body.unwrap()[0]["orderId"], "o2");

    let by_driver = gw.client.get("/OrderController/listOrderByDriver", &[("driverId", "d1")]).await.unwrap();
    assert_eq!(by_driver.body.unwrap().as_array().unwrap().len(), 2);

    let detail = json!({ "odId": "od1", "orderId": "o1", "foodId": "f1", "quantity": 2 });
    assert_eq!(gw.client.post("/OrderDetailetController/saveDetailet", &detail).await.unwrap().status, 200);
    assert_eq!(gw.client.post("/OrderDetailetController/saveDetailet", &detail).await.unwrap().status, 409);
    let details = gw.client.get("/OrderDetailetController/listDetailetByOrder", &[("orderId", "o1")]).await.unwrap();
    assert_eq!(details.body.unwrap()[0]["quantity"], 2);

    let removed = gw.client.delete("/OrderController/removeOrder", &[("orderId", "o1")]).await.unwrap();
    assert_eq!(removed.status, 204);
    assert!(removed.body.is_none());

    let left = gw.client.get("/OrderController/listOrderByUser", &[("userId", "u1")]).await.unwrap();
    assert_eq!(left.body.unwrap().as_array().unwrap().len(), 1);

    gw.stop().await;
}

#[tokio::test]
async fn test_address_routes() {
    let gw = common::start_gateway(common::test_config(BreakerConfig::default())).await;
    let address = json!({ "daId": "da1", "userId": "u1", "address": "1 Main St" });

    assert_eq!(gw.client.post("/DeliveryAddressController/saveAddress", &address).await.unwrap().status, 200);

    let found = gw.client.get("/DeliveryAddressController/getAddressBydaId", &[("daId", "da1")]).await.unwrap();
    assert_eq!(found.body.unwrap()["address"], "1 Main St");

    let listed = gw.client.get("/DeliveryAddressController/listAddressByUser", &[("userId", "u1")]).await.unwrap();
    assert_eq!(listed.body.unwrap().as_array().unwrap().len(), 1);

    let removed = gw.client.delete("/DeliveryAddressController/removeAddress", &[("daId", "da1")]).await.unwrap();
    assert_eq!(removed.status, 204);

    let gone = gw.client.get("/DeliveryAddressController/getAddressBydaId", &[("daId", "da1")]).await.unwrap();
    assert_eq!(gone.status, 404);

    gw.stop().await;
}
