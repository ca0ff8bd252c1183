use super::*;

async fn place_order(ctx: &TestContext) -> (String, String) {
    let item_id = seed_item(ctx, "MNU0001", "Biryani", 450.0, true).await;
    let order = ctx
        .service
        .create_order(takeaway_request(
            &ctx.customer_id,
            vec![LineRequest {
                menu_item_id: item_id,
                quantity: 1,
            }],
        ))
        .await
        .unwrap();
    (order.id.unwrap().to_string(), order.order_number)
}

#[tokio::test]
async fn pending_to_ready_succeeds_and_emits_info() {
    let ctx = setup().await;
    let (order_id, order_number) = place_order(&ctx).await;

    let updated = ctx
        .service
        .set_order_status(&order_id, OrderStatus::Ready, false)
        .await
        .unwrap();
    assert_eq!(updated.order_status, OrderStatus::Ready);

    // Intake success + status info
    let feed = wait_for_feed(&ctx, 2).await;
    let info = feed
        .iter()
        .find(|n| n.kind == NotificationKind::Info)
        .expect("status notification");
    assert!(info.message.contains(&order_number));
    assert!(info.message.contains("Ready"));
}

#[tokio::test]
async fn backwards_moves_need_force() {
    let ctx = setup().await;
    let (order_id, _) = place_order(&ctx).await;

    ctx.service
        .set_order_status(&order_id, OrderStatus::Ready, false)
        .await
        .unwrap();

    let err = ctx
        .service
        .set_order_status(&order_id, OrderStatus::Preparing, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Staff override path stays open
    let updated = ctx
        .service
        .set_order_status(&order_id, OrderStatus::Preparing, true)
        .await
        .unwrap();
    assert_eq!(updated.order_status, OrderStatus::Preparing);
}

#[tokio::test]
async fn reasserting_status_only_refreshes_updated_at() {
    let ctx = setup().await;
    let (order_id, _) = place_order(&ctx).await;
    let before = ctx.service.get_order(&order_id).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let after = ctx
        .service
        .set_order_status(&order_id, OrderStatus::Pending, false)
        .await
        .unwrap();

    assert_eq!(after.order_number, before.order_number);
    assert_eq!(after.order_status, before.order_status);
    assert_eq!(after.payment_status, before.payment_status);
    assert_eq!(after.total, before.total);
    assert_eq!(after.items.len(), before.items.len());
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn cancelling_an_active_order_is_allowed() {
    let ctx = setup().await;
    let (order_id, _) = place_order(&ctx).await;

    ctx.service
        .set_order_status(&order_id, OrderStatus::Preparing, false)
        .await
        .unwrap();
    let cancelled = ctx
        .service
        .set_order_status(&order_id, OrderStatus::Cancelled, false)
        .await
        .unwrap();
    assert_eq!(cancelled.order_status, OrderStatus::Cancelled);

    // Terminal without force
    let err = ctx
        .service
        .set_order_status(&order_id, OrderStatus::Pending, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn payment_paid_stores_receipt_and_emits_success() {
    let ctx = setup().await;
    let (order_id, _) = place_order(&ctx).await;

    let updated = ctx
        .service
        .set_payment_status(
            &order_id,
            PaymentStatus::Paid,
            Some("QGH7K2M9XT".into()),
            false,
        )
        .await
        .unwrap();
    assert_eq!(updated.payment_status, PaymentStatus::Paid);
    assert_eq!(updated.mpesa_receipt.as_deref(), Some("QGH7K2M9XT"));

    let feed = wait_for_feed(&ctx, 2).await;
    let payment = feed
        .iter()
        .find(|n| n.title == "Payment Updated")
        .expect("payment notification");
    assert_eq!(payment.kind, NotificationKind::Success);
    assert!(payment.message.contains("450"));
}

#[tokio::test]
async fn payment_failed_emits_warning() {
    let ctx = setup().await;
    let (order_id, _) = place_order(&ctx).await;

    ctx.service
        .set_payment_status(&order_id, PaymentStatus::Failed, None, false)
        .await
        .unwrap();

    let feed = wait_for_feed(&ctx, 2).await;
    let payment = feed
        .iter()
        .find(|n| n.title == "Payment Updated")
        .expect("payment notification");
    assert_eq!(payment.kind, NotificationKind::Warning);
}

#[tokio::test]
async fn paid_cannot_silently_return_to_pending() {
    let ctx = setup().await;
    let (order_id, _) = place_order(&ctx).await;

    ctx.service
        .set_payment_status(&order_id, PaymentStatus::Paid, None, false)
        .await
        .unwrap();

    let err = ctx
        .service
        .set_payment_status(&order_id, PaymentStatus::Pending, None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let forced = ctx
        .service
        .set_payment_status(&order_id, PaymentStatus::Pending, None, true)
        .await
        .unwrap();
    assert_eq!(forced.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn refund_follows_paid() {
    let ctx = setup().await;
    let (order_id, _) = place_order(&ctx).await;

    ctx.service
        .set_payment_status(&order_id, PaymentStatus::Paid, None, false)
        .await
        .unwrap();
    let refunded = ctx
        .service
        .set_payment_status(&order_id, PaymentStatus::Refunded, None, false)
        .await
        .unwrap();
    assert_eq!(refunded.payment_status, PaymentStatus::Refunded);
}

#[tokio::test]
async fn receipt_is_last_write_wins() {
    let ctx = setup().await;
    let (order_id, _) = place_order(&ctx).await;

    ctx.service
        .set_payment_status(&order_id, PaymentStatus::Paid, Some("FIRST111".into()), false)
        .await
        .unwrap();
    let updated = ctx
        .service
        .set_payment_status(&order_id, PaymentStatus::Paid, Some("SECOND22".into()), false)
        .await
        .unwrap();
    assert_eq!(updated.mpesa_receipt.as_deref(), Some("SECOND22"));
}
