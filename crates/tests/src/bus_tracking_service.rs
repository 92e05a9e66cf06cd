use crate::support::*;
use bus_tracking_service::common::geofence::{classify_proximity, ProximityZone};
use bus_tracking_service::common::types::*;
use bus_tracking_service::common::utils::distance_between_in_meters;
use bus_tracking_service::domain::action::{driver, stream, tracking};
use bus_tracking_service::domain::types::driver::{
    RecordAttendanceRequest, UpdateVehicleLocationRequest,
};
use bus_tracking_service::domain::types::stream::SubscriptionRequest;
use bus_tracking_service::notification::cooldown::cooldown_key;
use bus_tracking_service::realtime::channel::vehicle_group;
use bus_tracking_service::tools::error::AppError;
use chrono::{Duration, Utc};
use serde_json::json;

fn location_request(pt: Point) -> UpdateVehicleLocationRequest {
    UpdateVehicleLocationRequest {
        pt,
        speed: None,
        heading: None,
        acc: None,
        ts: None,
    }
}

fn token(value: &str) -> Token {
    Token(value.to_string())
}

mod distance {
    use super::*;

    #[test]
    fn is_symmetric() {
        let a = point(12.9716, 77.5946);
        let b = point(51.5074, -0.1278);

        let forward = distance_between_in_meters(&a, &b);
        let backward = distance_between_in_meters(&b, &a);

        assert!((forward - backward).abs() < 1e-9);
        assert!(forward > 0.0);
    }

    #[test]
    fn is_zero_for_identical_points() {
        let a = point(-33.8688, 151.2093);

        assert!(distance_between_in_meters(&a, &a).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = point(10.0, 76.0);
        let b = point(11.0, 76.0);

        let distance = distance_between_in_meters(&a, &b);

        assert!((distance - METERS_PER_DEGREE_LATITUDE).abs() < 1.0);
    }

    #[test]
    fn crosses_the_antimeridian() {
        let a = point(0.0, 179.999);
        let b = point(0.0, -179.999);

        let distance = distance_between_in_meters(&a, &b);

        // 0.002 degrees of longitude at the equator, not most of the globe
        assert!((distance - 222.39).abs() < 1.0);
    }
}

mod geofence {
    use super::*;

    #[test]
    fn classifies_with_inclusive_boundaries() {
        assert_eq!(classify_proximity(150.0), Some(ProximityZone::Arrived));
        assert_eq!(classify_proximity(200.0), Some(ProximityZone::Arrived));
        assert_eq!(classify_proximity(200.01), Some(ProximityZone::Approaching));
        assert_eq!(classify_proximity(500.0), Some(ProximityZone::Approaching));
        assert_eq!(
            classify_proximity(1000.0),
            Some(ProximityZone::Approaching)
        );
        assert_eq!(classify_proximity(1000.01), None);
        assert_eq!(classify_proximity(1500.0), None);
    }
}

mod dispatcher {
    use super::*;

    #[tokio::test]
    async fn suppresses_repeats_within_the_cooldown_window() {
        let ctx = build_context(Duration::minutes(5));
        let guardian = UserId("guardian-1".to_string());

        let first = ctx
            .data
            .dispatcher
            .dispatch(
                &guardian,
                NotificationKind::VehicleArrived,
                "Bus arrived",
                "The bus has arrived.",
                json!({}),
                Some("arrived:stop-1"),
            )
            .await
            .unwrap();
        let second = ctx
            .data
            .dispatcher
            .dispatch(
                &guardian,
                NotificationKind::VehicleArrived,
                "Bus arrived",
                "The bus has arrived.",
                json!({}),
                Some("arrived:stop-1"),
            )
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(ctx.store.notification_count(), 1);
    }

    #[tokio::test]
    async fn always_creates_without_a_dedupe_key() {
        let ctx = build_context(Duration::minutes(5));
        let guardian = UserId("guardian-1".to_string());

        for _ in 0..2 {
            let created = ctx
                .data
                .dispatcher
                .dispatch(
                    &guardian,
                    NotificationKind::RiderBoarded,
                    "Rider boarded",
                    "A rider boarded the bus.",
                    json!({}),
                    None,
                )
                .await
                .unwrap();
            assert!(created.is_some());
        }

        assert_eq!(ctx.store.notification_count(), 2);
    }

    #[tokio::test]
    async fn dispatches_again_once_the_window_has_passed() {
        let ctx = build_context(Duration::minutes(5));
        let guardian = UserId("guardian-1".to_string());

        let key = cooldown_key(&guardian, &NotificationKind::VehicleArrived, "arrived:stop-1");
        ctx.cooldowns
            .set_last_emitted(&key, TimeStamp(Utc::now() - Duration::minutes(6)));

        let created = ctx
            .data
            .dispatcher
            .dispatch(
                &guardian,
                NotificationKind::VehicleArrived,
                "Bus arrived",
                "The bus has arrived.",
                json!({}),
                Some("arrived:stop-1"),
            )
            .await
            .unwrap();

        assert!(created.is_some());
        assert_eq!(ctx.store.notification_count(), 1);
    }

    #[tokio::test]
    async fn cooldown_is_scoped_per_recipient() {
        let ctx = build_context(Duration::minutes(5));

        for guardian in ["guardian-1", "guardian-2"] {
            let created = ctx
                .data
                .dispatcher
                .dispatch(
                    &UserId(guardian.to_string()),
                    NotificationKind::VehicleArrived,
                    "Bus arrived",
                    "The bus has arrived.",
                    json!({}),
                    Some("arrived:stop-1"),
                )
                .await
                .unwrap();
            assert!(created.is_some());
        }

        assert_eq!(ctx.store.notification_count(), 2);
    }

    #[tokio::test]
    async fn broadcasts_once_per_created_event() {
        let ctx = build_context(Duration::minutes(5));
        let guardian = UserId("guardian-1".to_string());

        let identity = AuthIdentity {
            user_id: guardian.to_owned(),
            role: UserRole::Guardian,
        };
        let (_connection_id, mut receiver) = ctx.channels.register(&identity);

        for _ in 0..2 {
            ctx.data
                .dispatcher
                .dispatch(
                    &guardian,
                    NotificationKind::VehicleArrived,
                    "Bus arrived",
                    "The bus has arrived.",
                    json!({}),
                    Some("arrived:stop-1"),
                )
                .await
                .unwrap();
        }

        let event = receiver.try_recv().expect("one notification frame");
        assert_eq!(event.event, "notification");
        assert_eq!(event.payload["kind"], json!("VEHICLE_ARRIVED"));
        assert!(receiver.try_recv().is_err());
    }
}

mod ingestion {
    use super::*;

    fn seeded_context() -> (crate::support::TestContext, VehicleId, Point) {
        let ctx = build_context(Duration::minutes(5));
        let vehicle_id = VehicleId("bus-001".to_string());
        let stop = point(12.9716, 77.5946);

        ctx.verifier.admit("driver-token", "driver-1", UserRole::Operator);
        ctx.store
            .assign_vehicle(&UserId("driver-1".to_string()), &vehicle_id);

        (ctx, vehicle_id, stop)
    }

    #[tokio::test]
    async fn nearby_sample_yields_an_arrived_notification_only() {
        let (ctx, vehicle_id, stop) = seeded_context();
        ctx.store.add_rider(rider(
            "Asha",
            &vehicle_id,
            registration_point("stop-1", "Main Gate", stop.to_owned()),
            "guardian-1",
        ));

        driver::update_vehicle_location(
            token("driver-token"),
            ctx.data.to_owned(),
            location_request(offset_north(&stop, 150.0)),
        )
        .await
        .unwrap();

        let kinds = ctx
            .store
            .notification_kinds_for(&UserId("guardian-1".to_string()));
        assert_eq!(kinds, vec![NotificationKind::VehicleArrived]);
        assert_eq!(ctx.store.sample_count(), 1);
    }

    #[tokio::test]
    async fn approaching_sample_yields_an_approaching_notification() {
        let (ctx, vehicle_id, stop) = seeded_context();
        ctx.store.add_rider(rider(
            "Asha",
            &vehicle_id,
            registration_point("stop-1", "Main Gate", stop.to_owned()),
            "guardian-1",
        ));

        driver::update_vehicle_location(
            token("driver-token"),
            ctx.data.to_owned(),
            location_request(offset_north(&stop, 500.0)),
        )
        .await
        .unwrap();

        let kinds = ctx
            .store
            .notification_kinds_for(&UserId("guardian-1".to_string()));
        assert_eq!(kinds, vec![NotificationKind::VehicleApproaching]);
    }

    #[tokio::test]
    async fn distant_sample_yields_no_notification() {
        let (ctx, vehicle_id, stop) = seeded_context();
        ctx.store.add_rider(rider(
            "Asha",
            &vehicle_id,
            registration_point("stop-1", "Main Gate", stop.to_owned()),
            "guardian-1",
        ));

        driver::update_vehicle_location(
            token("driver-token"),
            ctx.data.to_owned(),
            location_request(offset_north(&stop, 1500.0)),
        )
        .await
        .unwrap();

        assert_eq!(ctx.store.notification_count(), 0);
        assert_eq!(ctx.store.sample_count(), 1);
    }

    #[tokio::test]
    async fn riders_sharing_a_stop_notify_their_own_guardians() {
        let (ctx, vehicle_id, stop) = seeded_context();
        let shared_point = registration_point("stop-1", "Main Gate", stop.to_owned());
        ctx.store.add_rider(rider(
            "Asha",
            &vehicle_id,
            shared_point.to_owned(),
            "guardian-1",
        ));
        ctx.store
            .add_rider(rider("Ravi", &vehicle_id, shared_point, "guardian-2"));

        driver::update_vehicle_location(
            token("driver-token"),
            ctx.data.to_owned(),
            location_request(offset_north(&stop, 150.0)),
        )
        .await
        .unwrap();

        assert_eq!(
            ctx.store
                .notification_kinds_for(&UserId("guardian-1".to_string())),
            vec![NotificationKind::VehicleArrived]
        );
        assert_eq!(
            ctx.store
                .notification_kinds_for(&UserId("guardian-2".to_string())),
            vec![NotificationKind::VehicleArrived]
        );
    }

    #[tokio::test]
    async fn repeated_samples_keep_broadcasting_but_notify_once() {
        let (ctx, vehicle_id, stop) = seeded_context();
        ctx.store.add_rider(rider(
            "Asha",
            &vehicle_id,
            registration_point("stop-1", "Main Gate", stop.to_owned()),
            "guardian-1",
        ));

        for _ in 0..2 {
            driver::update_vehicle_location(
                token("driver-token"),
                ctx.data.to_owned(),
                location_request(offset_north(&stop, 150.0)),
            )
            .await
            .unwrap();
        }

        assert_eq!(ctx.store.sample_count(), 2);
        assert_eq!(ctx.store.notification_count(), 1);
    }

    #[tokio::test]
    async fn position_is_broadcast_to_vehicle_subscribers() {
        let (ctx, vehicle_id, stop) = seeded_context();

        let identity = AuthIdentity {
            user_id: UserId("guardian-1".to_string()),
            role: UserRole::Guardian,
        };
        let (connection_id, mut receiver) = ctx.channels.register(&identity);
        ctx.channels
            .join(&connection_id, &vehicle_group(&vehicle_id));

        driver::update_vehicle_location(
            token("driver-token"),
            ctx.data.to_owned(),
            location_request(stop),
        )
        .await
        .unwrap();

        let event = receiver.try_recv().expect("position frame");
        assert_eq!(event.event, "position");
        assert_eq!(event.payload["vehicleId"], json!("bus-001"));
    }

    #[tokio::test]
    async fn operator_without_assignment_is_rejected() {
        let ctx = build_context(Duration::minutes(5));
        ctx.verifier
            .admit("driver-token", "driver-1", UserRole::Operator);

        let vehicle_id = VehicleId("bus-001".to_string());
        let identity = AuthIdentity {
            user_id: UserId("guardian-1".to_string()),
            role: UserRole::Guardian,
        };
        let (connection_id, mut receiver) = ctx.channels.register(&identity);
        ctx.channels
            .join(&connection_id, &vehicle_group(&vehicle_id));

        let result = driver::update_vehicle_location(
            token("driver-token"),
            ctx.data.to_owned(),
            location_request(point(12.9716, 77.5946)),
        )
        .await;

        assert!(matches!(result, Err(AppError::VehicleAssignmentNotFound)));
        assert_eq!(ctx.store.sample_count(), 0);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn non_operator_roles_are_rejected() {
        let ctx = build_context(Duration::minutes(5));
        ctx.verifier
            .admit("guardian-token", "guardian-1", UserRole::Guardian);

        let result = driver::update_vehicle_location(
            token("guardian-token"),
            ctx.data.to_owned(),
            location_request(point(12.9716, 77.5946)),
        )
        .await;

        assert!(matches!(result, Err(AppError::AccessDenied)));
        assert_eq!(ctx.store.sample_count(), 0);
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected() {
        let (ctx, _vehicle_id, _stop) = seeded_context();

        let result = driver::update_vehicle_location(
            token("driver-token"),
            ctx.data.to_owned(),
            location_request(point(95.0, 77.5946)),
        )
        .await;

        assert!(matches!(result, Err(AppError::InvalidGPSData(_))));
        assert_eq!(ctx.store.sample_count(), 0);
    }
}

mod subscription {
    use super::*;

    #[tokio::test]
    async fn short_vehicle_ids_are_silently_ignored() {
        let ctx = build_context(Duration::minutes(5));
        ctx.verifier
            .admit("guardian-token", "guardian-1", UserRole::Guardian);

        let identity = AuthIdentity {
            user_id: UserId("guardian-1".to_string()),
            role: UserRole::Guardian,
        };
        let (connection_id, _receiver) = ctx.channels.register(&identity);

        let ConnectionId(raw_connection_id) = connection_id.to_owned();
        let result = stream::subscribe_vehicle(
            token("guardian-token"),
            ctx.data.to_owned(),
            SubscriptionRequest {
                connection_id: raw_connection_id,
                vehicle_id: "ab".to_string(),
            },
        )
        .await;

        assert!(result.is_ok());
        assert!(!ctx
            .channels
            .is_member(&connection_id, &vehicle_group(&VehicleId("ab".to_string()))));
    }

    #[tokio::test]
    async fn subscribe_and_unsubscribe_drive_membership() {
        let ctx = build_context(Duration::minutes(5));
        ctx.verifier
            .admit("guardian-token", "guardian-1", UserRole::Guardian);
        let vehicle_id = VehicleId("bus-001".to_string());

        let identity = AuthIdentity {
            user_id: UserId("guardian-1".to_string()),
            role: UserRole::Guardian,
        };
        let (connection_id, _receiver) = ctx.channels.register(&identity);
        let ConnectionId(raw_connection_id) = connection_id.to_owned();

        stream::subscribe_vehicle(
            token("guardian-token"),
            ctx.data.to_owned(),
            SubscriptionRequest {
                connection_id: raw_connection_id.to_owned(),
                vehicle_id: "bus-001".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(ctx
            .channels
            .is_member(&connection_id, &vehicle_group(&vehicle_id)));

        stream::unsubscribe_vehicle(
            token("guardian-token"),
            ctx.data.to_owned(),
            SubscriptionRequest {
                connection_id: raw_connection_id,
                vehicle_id: "bus-001".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(!ctx
            .channels
            .is_member(&connection_id, &vehicle_group(&vehicle_id)));
    }

    #[tokio::test]
    async fn unadmitted_credentials_never_reach_the_channel_registry() {
        let ctx = build_context(Duration::minutes(5));

        let opened = stream::open_stream(token("unknown-token"), ctx.data.to_owned()).await;
        assert!(matches!(opened, Err(AppError::OperatorAppAuthFailed)));

        let subscribed = stream::subscribe_vehicle(
            token("unknown-token"),
            ctx.data.to_owned(),
            SubscriptionRequest {
                connection_id: "conn-1".to_string(),
                vehicle_id: "bus-001".to_string(),
            },
        )
        .await;
        assert!(matches!(subscribed, Err(AppError::OperatorAppAuthFailed)));
    }
}

mod attendance {
    use super::*;

    fn seeded_context() -> (crate::support::TestContext, VehicleId, RiderId) {
        let ctx = build_context(Duration::minutes(5));
        let vehicle_id = VehicleId("bus-001".to_string());

        ctx.verifier
            .admit("driver-token", "driver-1", UserRole::Operator);
        ctx.store
            .assign_vehicle(&UserId("driver-1".to_string()), &vehicle_id);

        let rider = rider(
            "Asha",
            &vehicle_id,
            registration_point("stop-1", "Main Gate", point(12.9716, 77.5946)),
            "guardian-1",
        );
        let rider_id = rider.id.to_owned();
        ctx.store.add_rider(rider);

        (ctx, vehicle_id, rider_id)
    }

    #[tokio::test]
    async fn boarding_notifies_the_guardian_and_the_vehicle_group() {
        let (ctx, vehicle_id, rider_id) = seeded_context();

        let identity = AuthIdentity {
            user_id: UserId("guardian-1".to_string()),
            role: UserRole::Guardian,
        };
        let (connection_id, mut receiver) = ctx.channels.register(&identity);
        ctx.channels
            .join(&connection_id, &vehicle_group(&vehicle_id));

        driver::record_attendance(
            token("driver-token"),
            ctx.data.to_owned(),
            RecordAttendanceRequest {
                rider_id,
                kind: AttendanceKind::Boarded,
            },
        )
        .await
        .unwrap();

        assert_eq!(
            ctx.store
                .notification_kinds_for(&UserId("guardian-1".to_string())),
            vec![NotificationKind::RiderBoarded]
        );

        // the guardian connection sits in both its user group and the
        // vehicle group, so it sees the notification and the attendance
        let first = receiver.try_recv().expect("notification frame");
        let second = receiver.try_recv().expect("attendance frame");
        assert_eq!(first.event, "notification");
        assert_eq!(second.event, "attendance");
        assert_eq!(second.payload["kind"], json!("BOARDED"));
    }

    #[tokio::test]
    async fn drop_off_skips_the_guardian_notification() {
        let (ctx, _vehicle_id, rider_id) = seeded_context();

        driver::record_attendance(
            token("driver-token"),
            ctx.data.to_owned(),
            RecordAttendanceRequest {
                rider_id,
                kind: AttendanceKind::DroppedOff,
            },
        )
        .await
        .unwrap();

        assert_eq!(ctx.store.notification_count(), 0);
        assert_eq!(ctx.store.attendance.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn riders_from_another_vehicle_are_rejected() {
        let (ctx, _vehicle_id, _rider_id) = seeded_context();

        let stray = rider(
            "Ravi",
            &VehicleId("bus-002".to_string()),
            registration_point("stop-9", "North Gate", point(13.0, 77.6)),
            "guardian-2",
        );
        let stray_id = stray.id.to_owned();
        ctx.store.add_rider(stray);

        let result = driver::record_attendance(
            token("driver-token"),
            ctx.data.to_owned(),
            RecordAttendanceRequest {
                rider_id: stray_id,
                kind: AttendanceKind::Boarded,
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::RiderNotFound(_))));
        assert_eq!(ctx.store.notification_count(), 0);
    }
}

mod reads {
    use super::*;

    #[tokio::test]
    async fn latest_location_reads_back_the_ingested_sample() {
        let ctx = build_context(Duration::minutes(5));
        let vehicle_id = VehicleId("bus-001".to_string());

        ctx.verifier
            .admit("driver-token", "driver-1", UserRole::Operator);
        ctx.verifier
            .admit("guardian-token", "guardian-1", UserRole::Guardian);
        ctx.store
            .assign_vehicle(&UserId("driver-1".to_string()), &vehicle_id);

        driver::update_vehicle_location(
            token("driver-token"),
            ctx.data.to_owned(),
            location_request(point(12.9716, 77.5946)),
        )
        .await
        .unwrap();

        let response = tracking::get_latest_vehicle_location(
            token("guardian-token"),
            ctx.data.to_owned(),
            vehicle_id.to_owned(),
        )
        .await
        .unwrap();

        assert_eq!(response.location.vehicle_id, vehicle_id);
    }

    #[tokio::test]
    async fn missing_location_is_a_not_found() {
        let ctx = build_context(Duration::minutes(5));
        ctx.verifier
            .admit("guardian-token", "guardian-1", UserRole::Guardian);

        let result = tracking::get_latest_vehicle_location(
            token("guardian-token"),
            ctx.data.to_owned(),
            VehicleId("bus-404".to_string()),
        )
        .await;

        assert!(matches!(result, Err(AppError::VehicleLocationNotFound(_))));
    }

    #[tokio::test]
    async fn notification_backlog_is_scoped_to_the_caller() {
        let ctx = build_context(Duration::minutes(5));
        ctx.verifier
            .admit("guardian-token", "guardian-1", UserRole::Guardian);

        for recipient in ["guardian-1", "guardian-2"] {
            ctx.data
                .dispatcher
                .dispatch(
                    &UserId(recipient.to_string()),
                    NotificationKind::RiderBoarded,
                    "Rider boarded",
                    "A rider boarded the bus.",
                    json!({}),
                    None,
                )
                .await
                .unwrap();
        }

        let response = tracking::list_notifications(token("guardian-token"), ctx.data.to_owned())
            .await
            .unwrap();

        assert_eq!(response.notifications.len(), 1);
        assert_eq!(
            response.notifications[0].recipient_user_id,
            UserId("guardian-1".to_string())
        );
    }
}
