//! Property-based tests for the alerting configuration core.
//!
//! Generates routing trees and receiver sets, then checks walker ordering,
//! the validator's rejection rules and encode/decode round trips for both
//! document variants.

#[cfg(test)]
mod tests {
    use crate::alerting::{
        classifier,
        decoder::{decode_gettable, decode_postable},
        error::ValidationError,
        types::*,
        validator::validate,
        walker::all_receivers,
    };
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    // Test data generators
    fn name_strategy() -> impl Strategy<Value = String> {
        "[a-z]{1,6}"
    }

    /// Routing trees whose receivers are drawn from `names`, at most four
    /// levels deep.
    fn route_strategy(names: Vec<String>) -> impl Strategy<Value = Route> {
        let leaf = prop::sample::select(names).prop_map(Route::to_receiver);
        leaf.prop_recursive(4, 32, 4, |inner| {
            (inner.clone(), prop::collection::vec(inner, 0..4)).prop_map(|(mut node, children)| {
                node.routes = children;
                node
            })
        })
    }

    fn managed_entry(name: &str) -> PostableManagedReceiver {
        PostableManagedReceiver {
            uid: format!("uid-{name}"),
            name: name.to_string(),
            kind: "email".to_string(),
            settings: serde_json::json!({ "addresses": format!("{name}@example.com") }),
            ..Default::default()
        }
    }

    fn managed(name: &str) -> PostableApiReceiver {
        Receiver::new(NativeReceiver::named(name), vec![managed_entry(name)])
    }

    fn native(name: &str, kind: IntegrationKind) -> PostableApiReceiver {
        let mut receiver = NativeReceiver::named(name);
        let mut settings = serde_json::Map::new();
        settings.insert("send_resolved".to_string(), serde_json::Value::Bool(true));
        receiver.configs_mut(kind).push(settings);
        Receiver::new(receiver, Vec::new())
    }

    fn kind_strategy() -> impl Strategy<Value = IntegrationKind> {
        prop::sample::select(IntegrationKind::ALL.to_vec())
    }

    /// Distinct receiver names plus a routing tree referencing only them.
    fn valid_names_and_route() -> impl Strategy<Value = (Vec<String>, Route)> {
        prop::collection::btree_set(name_strategy(), 1..6)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_flat_map(|names| {
                let route = route_strategy(names.clone());
                (Just(names), route)
            })
    }

    fn raw(route: Route, receivers: Vec<PostableApiReceiver>) -> RawApiAlertingConfig<PostableManagedReceiver> {
        RawApiAlertingConfig {
            routing: RoutingConfig {
                route: Some(route),
                ..RoutingConfig::default()
            },
            receivers,
        }
    }

    fn count_routes(route: &Route) -> usize {
        1 + route.routes.iter().map(count_routes).sum::<usize>()
    }

    fn pre_order(route: &Route, out: &mut Vec<String>) {
        out.extend(route.receiver.clone());
        for child in &route.routes {
            pre_order(child, out);
        }
    }

    // =============================================================================
    // UNIT TESTS - Walker
    // =============================================================================

    #[test]
    fn walker_lists_root_then_children() {
        let route = Route::to_receiver("r0")
            .with_child(Route::to_receiver("r1"))
            .with_child(Route::to_receiver("r2"));
        assert_eq!(all_receivers(&route), vec!["r0", "r1", "r2"]);
    }

    // =============================================================================
    // UNIT TESTS - Conversion
    // =============================================================================

    #[test]
    fn try_from_rejects_invalid_raw_document() {
        let result = ApiAlertingConfig::try_from(raw(
            Route::to_receiver("a"),
            vec![managed("a"), native("b", IntegrationKind::Pushover)],
        ));
        assert_eq!(result.unwrap_err(), ValidationError::BackendMix);
    }

    #[test]
    fn to_gettable_numbers_managed_receivers_and_hides_secrets() {
        let mut first = managed("a");
        first.managed[0]
            .secure_settings
            .insert("token".to_string(), "s3cret".to_string());
        let second = managed("b");

        let config = PostableUserConfig::try_from(RawUserConfig {
            template_files: Default::default(),
            alertmanager_config: raw(
                Route::to_receiver("a").with_child(Route::to_receiver("b")),
                vec![first, second],
            ),
        })
        .unwrap();

        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let gettable = config.to_gettable(at);

        assert_eq!(gettable.backend(), Backend::Grafana);
        let receivers = gettable.alertmanager_config().receivers();
        assert_eq!(receivers[0].managed()[0].id, 1);
        assert_eq!(receivers[1].managed()[0].id, 2);
        assert_eq!(receivers[0].managed()[0].created, Some(at));
        assert_eq!(
            receivers[0].managed()[0].secure_fields.get("token"),
            Some(&true)
        );

        let encoded = serde_json::to_string(&gettable).unwrap();
        assert!(!encoded.contains("s3cret"));
    }

    // =============================================================================
    // PROPERTY TESTS
    // =============================================================================

    proptest! {
        #[test]
        fn prop_walker_is_pre_order_and_complete(
            (_names, route) in valid_names_and_route()
        ) {
            let walked: Vec<String> = all_receivers(&route).into_iter().map(String::from).collect();

            let mut expected = Vec::new();
            pre_order(&route, &mut expected);

            prop_assert_eq!(walked.len(), count_routes(&route));
            prop_assert_eq!(walked, expected);
        }

        #[test]
        fn prop_all_managed_documents_validate_as_grafana(
            (names, route) in valid_names_and_route()
        ) {
            let receivers: Vec<_> = names.iter().map(|n| managed(n)).collect();
            let config = ApiAlertingConfig::try_from(raw(route, receivers)).unwrap();
            prop_assert_eq!(config.backend(), Backend::Grafana);
        }

        #[test]
        fn prop_all_native_documents_validate_as_alertmanager(
            (names, route) in valid_names_and_route(),
            kind in kind_strategy(),
        ) {
            let receivers: Vec<_> = names.iter().map(|n| native(n, kind)).collect();
            let config = ApiAlertingConfig::try_from(raw(route, receivers)).unwrap();
            prop_assert_eq!(config.backend(), Backend::Alertmanager);
        }

        #[test]
        fn prop_dropping_a_referenced_receiver_is_undefined(
            (names, route) in valid_names_and_route(),
            pick in any::<prop::sample::Index>(),
        ) {
            let referenced: Vec<String> = all_receivers(&route).into_iter().map(String::from).collect();
            let dropped = pick.get(&referenced).clone();

            let receivers: Vec<_> = names
                .iter()
                .filter(|n| **n != dropped)
                .map(|n| managed(n))
                .collect();

            prop_assert_eq!(
                validate(&raw(route, receivers)),
                Err(ValidationError::undefined_receiver(dropped))
            );
        }

        #[test]
        fn prop_mixed_receiver_is_rejected(
            (names, route) in valid_names_and_route(),
            pick in any::<prop::sample::Index>(),
            kind in kind_strategy(),
        ) {
            let mixed = pick.get(&names).clone();
            let receivers: Vec<_> = names
                .iter()
                .map(|n| {
                    let mut receiver = managed(n);
                    if *n == mixed {
                        receiver.native.configs_mut(kind).push(serde_json::Map::new());
                    }
                    receiver
                })
                .collect();

            prop_assert_eq!(
                validate(&raw(route, receivers)),
                Err(ValidationError::receiver_mix(mixed, kind))
            );
        }

        #[test]
        fn prop_native_beside_managed_is_backend_mix(
            (names, route) in valid_names_and_route(),
            kind in kind_strategy(),
        ) {
            let mut receivers: Vec<_> = names.iter().map(|n| managed(n)).collect();
            // The dash keeps it distinct from every generated name.
            receivers.push(native("native-extra", kind));

            prop_assert_eq!(validate(&raw(route, receivers)), Err(ValidationError::BackendMix));
        }

        #[test]
        fn prop_postable_round_trip(
            (names, route) in valid_names_and_route(),
            templates in prop::collection::btree_map(name_strategy(), ".{0,20}", 0..3),
        ) {
            let receivers: Vec<_> = names.iter().map(|n| managed(n)).collect();
            let config = PostableUserConfig::try_from(RawUserConfig {
                template_files: templates,
                alertmanager_config: raw(route, receivers),
            }).unwrap();

            let encoded = serde_json::to_vec(&config).unwrap();
            prop_assert_eq!(decode_postable(&encoded).unwrap(), config);
        }

        #[test]
        fn prop_gettable_round_trip(
            (names, route) in valid_names_and_route(),
        ) {
            let receivers: Vec<_> = names
                .iter()
                .map(|n| {
                    let mut receiver = managed(n);
                    receiver.managed[0]
                        .secure_settings
                        .insert("token".to_string(), format!("secret-{n}"));
                    receiver
                })
                .collect();
            let postable = PostableUserConfig::try_from(RawUserConfig {
                template_files: Default::default(),
                alertmanager_config: raw(route, receivers),
            }).unwrap();
            let gettable = postable.to_gettable(Utc::now());

            let encoded = serde_json::to_vec(&gettable).unwrap();
            let decoded = decode_gettable(&encoded).unwrap();
            prop_assert_eq!(decoded.backend(), Backend::Grafana);
            prop_assert_eq!(decoded, gettable);
        }

        #[test]
        fn prop_native_read_model_round_trip(
            (names, route) in valid_names_and_route(),
            kind in kind_strategy(),
        ) {
            let receivers: Vec<_> = names.iter().map(|n| native(n, kind)).collect();
            let postable = PostableUserConfig::try_from(RawUserConfig {
                template_files: Default::default(),
                alertmanager_config: raw(route, receivers),
            }).unwrap();
            let gettable = postable.to_gettable(Utc::now());

            let encoded = serde_json::to_vec(&gettable).unwrap();
            prop_assert_eq!(decode_gettable(&encoded).unwrap(), gettable);
        }

        #[test]
        fn prop_receiver_type_matches_managed_presence(
            name in name_strategy(),
            managed_count in 0usize..3,
        ) {
            let receiver: PostableApiReceiver = Receiver::new(
                NativeReceiver::named(name.clone()),
                (0..managed_count).map(|_| managed_entry(&name)).collect(),
            );
            let expected = if managed_count == 0 { ReceiverType::Native } else { ReceiverType::Managed };
            prop_assert_eq!(classifier::receiver_type(&receiver), expected);
            prop_assert_eq!(receiver.receiver_type(), expected);
        }
    }
}
