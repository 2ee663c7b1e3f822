use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use delivery_actors::mock::MockClient;
use delivery_actors::{Deadline, FrameworkError};
use delivery_platform::auth::{
    AuthDelegate, AuthError, Claims, Credential, IssuedToken, MockTokenAuthority, TokenAuthority,
};
use delivery_platform::clients::CatalogClient;
use delivery_platform::error::UpstreamError;
use delivery_platform::model::{
    DeliveryInfo, MerchantId, Order, OrderId, OrderQuery, OrderStatus, Product, ProductId, Role,
    UserId,
};
use delivery_platform::order_actor::OrderAction;
use delivery_platform::ordering::{
    CreateOrderError, ManageOrderError, MockCatalogQuery, MockOrderRepository, OrderError,
    OrderItemRequest, OrderItems, OrderOrchestrator, TransitionError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

fn claims(id: u32, role: Role) -> Claims {
    let issued_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    Claims {
        sub: UserId(id),
        email: format!("user{id}@example.com"),
        role,
        issued_at,
        expires_at: issued_at + chrono::Duration::hours(1),
    }
}

fn product(id: u32, merchant: u32, price: Decimal, available: bool) -> Product {
    Product {
        id: ProductId(id),
        merchant_id: MerchantId(merchant),
        name: format!("Dish {id}"),
        description: String::new(),
        price,
        available,
        category: "mains".into(),
    }
}

fn menu() -> Vec<Product> {
    vec![
        product(101, 7, dec!(5.00), true),
        product(102, 7, dec!(3.50), true),
    ]
}

fn delivery() -> DeliveryInfo {
    DeliveryInfo {
        client_name: "Ines".into(),
        client_phone: "555-0101".into(),
        address: "1 Harbour St".into(),
        lat: 41.38,
        lng: 2.17,
    }
}

fn line(product_id: u32, quantity: i64) -> OrderItemRequest {
    OrderItemRequest {
        product_id: ProductId(product_id),
        quantity,
        comment: None,
        price: None,
    }
}

fn stored_order(id: u32, client: u32, status: OrderStatus) -> Order {
    Order {
        id: OrderId(id),
        client_id: UserId(client),
        client_name: "Ines".into(),
        client_phone: "555-0101".into(),
        delivery_address: "1 Harbour St".into(),
        lat: 41.38,
        lng: 2.17,
        merchant_id: MerchantId(7),
        items: Vec::new(),
        total_cost: dec!(13.50),
        status,
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 5, 0).unwrap(),
        cancellation_reason: None,
    }
}

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(5))
}

fn catalog_with_menu() -> MockCatalogQuery {
    let mut catalog = MockCatalogQuery::new();
    catalog
        .expect_get_products_by_ids()
        .times(1)
        .returning(|_, _| Ok(menu()));
    catalog
}

#[tokio::test]
async fn customer_order_is_priced_from_the_catalog_and_persisted() {
    let mut orders = MockOrderRepository::new();
    orders.expect_insert().times(1).returning(|order, _| {
        assert_eq!(order.client_id, UserId(3));
        assert_eq!(order.merchant_id, MerchantId(7));
        assert_eq!(order.total_cost, dec!(13.50));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].unit_price, dec!(5.00));
        assert_eq!(order.items[0].comment.as_deref(), Some("no onions"));
        Ok(OrderId(41))
    });
    let orchestrator = OrderOrchestrator::new(Arc::new(catalog_with_menu()), Arc::new(orders));

    let mut first = line(101, 1);
    first.comment = Some("no onions".into());
    let items = OrderItems::merge(vec![first, line(102, 1), line(101, 1)]).unwrap();

    let receipt = orchestrator
        .create_order(&claims(3, Role::Customer), delivery(), &items, deadline())
        .await
        .unwrap();

    assert_eq!(receipt.order_id, OrderId(41));
    assert_eq!(receipt.status, OrderStatus::Created);
}

#[tokio::test]
async fn couriers_cannot_order_and_nothing_downstream_is_called() {
    let mut catalog = MockCatalogQuery::new();
    catalog.expect_get_products_by_ids().never();
    let mut orders = MockOrderRepository::new();
    orders.expect_insert().never();
    let orchestrator = OrderOrchestrator::new(Arc::new(catalog), Arc::new(orders));

    let items = OrderItems::merge(vec![line(101, 1)]).unwrap();
    let err = orchestrator
        .create_order(&claims(3, Role::Courier), delivery(), &items, deadline())
        .await
        .unwrap_err();

    assert_eq!(err, CreateOrderError::Auth(AuthError::Forbidden));
}

#[tokio::test]
async fn validation_failure_persists_nothing() {
    let mut catalog = MockCatalogQuery::new();
    catalog
        .expect_get_products_by_ids()
        .times(1)
        .returning(|_, _| Ok(vec![product(101, 7, dec!(5.00), true)]));
    let mut orders = MockOrderRepository::new();
    orders.expect_insert().never();
    let orchestrator = OrderOrchestrator::new(Arc::new(catalog), Arc::new(orders));

    let items = OrderItems::merge(vec![line(101, 1), line(999, 1)]).unwrap();
    let err = orchestrator
        .create_order(&claims(3, Role::Customer), delivery(), &items, deadline())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CreateOrderError::Order(OrderError::MissingProduct {
            ids: vec![ProductId(999)]
        })
    );
}

#[tokio::test]
async fn catalog_outage_surfaces_as_upstream_error() {
    let mut catalog_mock = MockClient::<Product>::new();
    catalog_mock
        .expect_query()
        .return_err(FrameworkError::ActorClosed);
    let catalog = CatalogClient::new(catalog_mock.client());

    let mut orders = MockOrderRepository::new();
    orders.expect_insert().never();
    let orchestrator = OrderOrchestrator::new(Arc::new(catalog), Arc::new(orders));

    let items = OrderItems::merge(vec![line(101, 1)]).unwrap();
    let err = orchestrator
        .create_order(&claims(3, Role::Customer), delivery(), &items, deadline())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CreateOrderError::Upstream(UpstreamError::Unavailable {
            service: "catalog-service",
            ..
        })
    ));
    catalog_mock.verify();
}

#[tokio::test]
async fn place_order_authenticates_and_validates_before_persisting() {
    let mut authority = MockTokenAuthority::new();
    let caller = claims(3, Role::Customer);
    authority
        .expect_validate_token()
        .times(1)
        .returning(move |_, _| Ok(caller.clone()));
    let delegate = AuthDelegate::new(Arc::new(authority), Duration::from_secs(5));

    let mut orders = MockOrderRepository::new();
    orders
        .expect_insert()
        .times(1)
        .returning(|_, _| Ok(OrderId(1)));
    let orchestrator = OrderOrchestrator::new(Arc::new(catalog_with_menu()), Arc::new(orders));

    let receipt = orchestrator
        .place_order(
            &delegate,
            Some("Bearer good-token"),
            delivery(),
            vec![line(101, 2), line(102, 1)],
            deadline(),
        )
        .await
        .unwrap();

    assert_eq!(receipt.order_id, OrderId(1));
}

#[tokio::test]
async fn caller_supplied_prices_never_change_the_total() {
    for claimed in [dec!(0), dec!(-20.00), dec!(0.01), dec!(999.99)] {
        let mut authority = MockTokenAuthority::new();
        let caller = claims(3, Role::Customer);
        authority
            .expect_validate_token()
            .returning(move |_, _| Ok(caller.clone()));
        let delegate = AuthDelegate::new(Arc::new(authority), Duration::from_secs(5));

        let mut orders = MockOrderRepository::new();
        orders.expect_insert().times(1).returning(|order, _| {
            assert_eq!(order.total_cost, dec!(13.50));
            Ok(OrderId(1))
        });
        let orchestrator =
            OrderOrchestrator::new(Arc::new(catalog_with_menu()), Arc::new(orders));

        let mut priced = line(101, 2);
        priced.price = Some(claimed);
        let mut other = line(102, 1);
        other.price = Some(claimed);

        orchestrator
            .place_order(
                &delegate,
                Some("Bearer good-token"),
                delivery(),
                vec![priced, other],
                deadline(),
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn malformed_header_makes_no_downstream_call() {
    let mut authority = MockTokenAuthority::new();
    authority.expect_validate_token().never();
    let delegate = AuthDelegate::new(Arc::new(authority), Duration::from_secs(5));

    let mut catalog = MockCatalogQuery::new();
    catalog.expect_get_products_by_ids().never();
    let mut orders = MockOrderRepository::new();
    orders.expect_insert().never();
    let orchestrator = OrderOrchestrator::new(Arc::new(catalog), Arc::new(orders));

    let err = orchestrator
        .place_order(
            &delegate,
            Some("Basic dXNlcjpwYXNz"),
            delivery(),
            vec![line(101, 1)],
            deadline(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, CreateOrderError::Auth(AuthError::TokenMalformed));
}

#[tokio::test]
async fn rejected_token_persists_nothing() {
    let mut authority = MockTokenAuthority::new();
    authority
        .expect_validate_token()
        .times(1)
        .returning(|_, _| Err(AuthError::TokenExpired));
    let delegate = AuthDelegate::new(Arc::new(authority), Duration::from_secs(5));

    let mut catalog = MockCatalogQuery::new();
    catalog
        .expect_get_products_by_ids()
        .times(0..=1)
        .returning(|_, _| Ok(menu()));
    let mut orders = MockOrderRepository::new();
    orders.expect_insert().never();
    let orchestrator = OrderOrchestrator::new(Arc::new(catalog), Arc::new(orders));

    let err = orchestrator
        .place_order(
            &delegate,
            Some("Bearer stale"),
            delivery(),
            vec![line(101, 1)],
            deadline(),
        )
        .await
        .unwrap_err();

    assert_eq!(err, CreateOrderError::Auth(AuthError::TokenExpired));
}

#[tokio::test]
async fn merchants_confirm_and_customers_cannot() {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_transition()
        .times(1)
        .returning(|id, action, _| {
            assert_eq!(id, OrderId(5));
            assert_eq!(action, OrderAction::Confirm);
            Ok(OrderStatus::Confirmed)
        });
    let orchestrator = OrderOrchestrator::new(Arc::new(MockCatalogQuery::new()), Arc::new(orders));

    let err = orchestrator
        .confirm_order(&claims(3, Role::Customer), OrderId(5), deadline())
        .await
        .unwrap_err();
    assert_eq!(err, ManageOrderError::Auth(AuthError::Forbidden));

    let status = orchestrator
        .confirm_order(&claims(8, Role::Merchant), OrderId(5), deadline())
        .await
        .unwrap();
    assert_eq!(status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn only_the_owner_or_an_admin_may_cancel() {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find()
        .times(2)
        .returning(|id, _| Ok(Some(stored_order(id.0, 3, OrderStatus::Created))));
    orders
        .expect_transition()
        .times(1)
        .returning(|_, action, _| {
            assert_eq!(
                action,
                OrderAction::Cancel {
                    reason: Some("changed my mind".into())
                }
            );
            Ok(OrderStatus::Cancelled)
        });
    let orchestrator = OrderOrchestrator::new(Arc::new(MockCatalogQuery::new()), Arc::new(orders));

    let err = orchestrator
        .cancel_order(&claims(4, Role::Customer), OrderId(5), None, deadline())
        .await
        .unwrap_err();
    assert_eq!(err, ManageOrderError::Auth(AuthError::Forbidden));

    let status = orchestrator
        .cancel_order(
            &claims(3, Role::Customer),
            OrderId(5),
            Some("changed my mind".into()),
            deadline(),
        )
        .await
        .unwrap();
    assert_eq!(status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn cancelling_a_confirmed_order_is_a_conflict() {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find()
        .returning(|id, _| Ok(Some(stored_order(id.0, 3, OrderStatus::Confirmed))));
    orders.expect_transition().returning(|_, _, _| {
        Err(TransitionError::InvalidTransition {
            from: OrderStatus::Confirmed,
            to: OrderStatus::Cancelled,
        })
    });
    let orchestrator = OrderOrchestrator::new(Arc::new(MockCatalogQuery::new()), Arc::new(orders));

    let err = orchestrator
        .cancel_order(&claims(3, Role::Customer), OrderId(5), None, deadline())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ManageOrderError::InvalidTransition {
            from: OrderStatus::Confirmed,
            to: OrderStatus::Cancelled,
        }
    );
}

#[tokio::test]
async fn unknown_orders_are_not_found() {
    let mut orders = MockOrderRepository::new();
    orders.expect_find().returning(|_, _| Ok(None));
    let orchestrator = OrderOrchestrator::new(Arc::new(MockCatalogQuery::new()), Arc::new(orders));

    let err = orchestrator
        .get_order(&claims(1, Role::Admin), OrderId(404), deadline())
        .await
        .unwrap_err();

    assert_eq!(err, ManageOrderError::NotFound(OrderId(404)));
}

/// A token authority that takes the call and never answers.
struct SilentAuthority;

#[async_trait]
impl TokenAuthority for SilentAuthority {
    async fn issue_token(&self, _: Credential, _: Deadline) -> Result<IssuedToken, AuthError> {
        std::future::pending().await
    }

    async fn validate_token(&self, _: &str, _: Deadline) -> Result<Claims, AuthError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn validation_failure_does_not_wait_for_authentication() {
    let delegate = AuthDelegate::new(Arc::new(SilentAuthority), Duration::from_secs(5));

    let mut catalog = MockCatalogQuery::new();
    catalog.expect_get_products_by_ids().times(1).returning(|_, _| {
        Ok(vec![
            product(101, 7, dec!(5.00), true),
            product(102, 9, dec!(3.50), true),
        ])
    });
    let mut orders = MockOrderRepository::new();
    orders.expect_insert().never();
    let orchestrator = OrderOrchestrator::new(Arc::new(catalog), Arc::new(orders));

    let started = tokio::time::Instant::now();
    let err = orchestrator
        .place_order(
            &delegate,
            Some("Bearer pending"),
            delivery(),
            vec![line(101, 1), line(102, 1)],
            Deadline::after(Duration::from_secs(30)),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CreateOrderError::Order(OrderError::MixedRestaurant {
            merchants: vec![MerchantId(7), MerchantId(9)]
        })
    );
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn authentication_failure_does_not_wait_for_the_catalog() {
    let mut authority = MockTokenAuthority::new();
    authority
        .expect_validate_token()
        .times(1)
        .returning(|_, _| Err(AuthError::TokenInvalidSignature));
    let delegate = AuthDelegate::new(Arc::new(authority), Duration::from_secs(5));

    let mut catalog_mock = MockClient::<Product>::new();
    catalog_mock.expect_query().stall();
    let catalog = CatalogClient::new(catalog_mock.client());

    let mut orders = MockOrderRepository::new();
    orders.expect_insert().never();
    let orchestrator = OrderOrchestrator::new(Arc::new(catalog), Arc::new(orders));

    let started = tokio::time::Instant::now();
    let err = orchestrator
        .place_order(
            &delegate,
            Some("Bearer forged"),
            delivery(),
            vec![line(101, 1)],
            Deadline::after(Duration::from_secs(30)),
        )
        .await
        .unwrap_err();

    assert_eq!(err, CreateOrderError::Auth(AuthError::TokenInvalidSignature));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn restaurant_orders_need_a_merchant_or_admin() {
    let mut orders = MockOrderRepository::new();
    orders.expect_list().times(2).returning(|query, _| {
        assert!(matches!(query, OrderQuery::ByMerchant(MerchantId(7))));
        Ok(vec![stored_order(5, 3, OrderStatus::Created)])
    });
    let orchestrator = OrderOrchestrator::new(Arc::new(MockCatalogQuery::new()), Arc::new(orders));

    for role in [Role::Merchant, Role::Admin] {
        let found = orchestrator
            .orders_for_merchant(&claims(8, role), MerchantId(7), deadline())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    let err = orchestrator
        .orders_for_merchant(&claims(3, Role::Customer), MerchantId(7), deadline())
        .await
        .unwrap_err();
    assert_eq!(err, ManageOrderError::Auth(AuthError::Forbidden));
}

#[tokio::test]
async fn admins_list_every_order() {
    let mut orders = MockOrderRepository::new();
    orders
        .expect_list()
        .times(1)
        .returning(|query, _| {
            assert!(matches!(query, OrderQuery::All));
            Ok(vec![
                stored_order(1, 3, OrderStatus::Created),
                stored_order(2, 4, OrderStatus::Confirmed),
            ])
        });
    let orchestrator = OrderOrchestrator::new(Arc::new(MockCatalogQuery::new()), Arc::new(orders));

    let all = orchestrator
        .list_orders(&claims(1, Role::Admin), deadline())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}
