use crate::core::bootstrap::IndexBootstrapper;
use crate::core::client::database::{DatabaseError, MockSchemaClient};
use crate::error::BootstrapError;
use crate::tests::common::{flight_specs, flights_target, InMemorySchemaClient};
use crate::types::index::{ExistingIndex, IndexKey, IndexSpec, PRIMARY_KEY_INDEX_NAME};
use crate::types::params::ConflictPolicy;
use crate::types::report::{CollectionOutcome, IndexOutcome, IndexStatus};
use crate::types::target::CollectionTarget;
use assert_matches::assert_matches;
use mongodb::bson::doc;
use rstest::*;

fn index_names(indexes: &[ExistingIndex]) -> Vec<String> {
    indexes.iter().map(|index| index.name.clone()).collect()
}

/// Empty database: the collection and all five indexes are created, plus the automatic `_id_`.
#[rstest]
#[tokio::test]
async fn bootstrap_on_empty_database_creates_everything(flights_target: CollectionTarget, flight_specs: Vec<IndexSpec>) {
    let client = InMemorySchemaClient::new();
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    let report = bootstrapper.run(&flights_target, &flight_specs).await.unwrap();

    assert_eq!(report.namespace, "flightsdb.flights");
    assert_eq!(report.collection, CollectionOutcome::Created);
    assert_eq!(report.created(), 5);
    assert!(report.is_success());
    assert!(report.indexes.iter().all(|index| index.outcome == IndexOutcome::Created));

    let indexes = client.indexes(&flights_target);
    assert_eq!(
        index_names(&indexes),
        vec![PRIMARY_KEY_INDEX_NAME, "uniq_route_day_flight", "carrier_day", "origin_day", "route_day", "arr_delay"]
    );
    for spec in &flight_specs {
        let existing = indexes.iter().find(|index| index.name == spec.name()).unwrap();
        assert!(existing.matches(spec), "{} does not match {}", existing, spec);
        assert!(!existing.unique);
    }
}

/// Running twice leaves the datastore as the first run left it.
#[rstest]
#[tokio::test]
async fn bootstrap_twice_is_idempotent(flights_target: CollectionTarget, flight_specs: Vec<IndexSpec>) {
    let client = InMemorySchemaClient::new();
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    bootstrapper.run(&flights_target, &flight_specs).await.unwrap();
    let after_first = client.indexes(&flights_target);

    let report = bootstrapper.run(&flights_target, &flight_specs).await.unwrap();

    assert_eq!(report.collection, CollectionOutcome::AlreadyExists);
    assert_eq!(report.already_present(), 5);
    assert_eq!(report.created(), 0);
    assert!(report.is_success());
    assert_eq!(client.indexes(&flights_target), after_first);
    assert_eq!(client.create_index_calls(), 5);
}

#[rstest]
#[tokio::test]
async fn ensure_collection_is_idempotent(flights_target: CollectionTarget) {
    let client = InMemorySchemaClient::new();
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    assert_eq!(bootstrapper.ensure_collection(&flights_target).await.unwrap(), CollectionOutcome::Created);
    assert_eq!(bootstrapper.ensure_collection(&flights_target).await.unwrap(), CollectionOutcome::AlreadyExists);
    assert_eq!(index_names(&client.indexes(&flights_target)), vec![PRIMARY_KEY_INDEX_NAME]);
}

/// Some indexes already exist from an earlier partial run: only the missing ones are created.
#[rstest]
#[tokio::test]
async fn bootstrap_completes_a_partial_index_set(flights_target: CollectionTarget, flight_specs: Vec<IndexSpec>) {
    let client = InMemorySchemaClient::new();
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);
    bootstrapper.run(&flights_target, &flight_specs[..2]).await.unwrap();

    let report = bootstrapper.run(&flights_target, &flight_specs).await.unwrap();

    assert_eq!(report.already_present(), 2);
    assert_eq!(report.created(), 3);
    assert_eq!(client.indexes(&flights_target).len(), 6);
}

#[rstest]
#[tokio::test]
async fn ensure_index_reports_conflict_for_different_definition(flights_target: CollectionTarget) {
    let client = InMemorySchemaClient::new();
    client.seed_index(&flights_target, ExistingIndex::new("route_day", doc! { "dest": 1, "origin": 1 }, false));
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);
    let spec = IndexSpec::new("route_day", vec![IndexKey::asc("origin"), IndexKey::asc("dest"), IndexKey::asc("fl_date")]);

    let result = bootstrapper.ensure_index(&flights_target, &spec).await;

    assert_matches!(result, Err(BootstrapError::IndexConflict { ref index, .. }) if index == "route_day");
    assert_eq!(client.create_index_calls(), 0);
}

/// Under the default policy a conflict is recorded, left untouched, and the other indexes still get created.
#[rstest]
#[tokio::test]
async fn conflict_is_recorded_and_remaining_indexes_are_created(
    flights_target: CollectionTarget,
    flight_specs: Vec<IndexSpec>,
) {
    let client = InMemorySchemaClient::new();
    let seeded = ExistingIndex::new("route_day", doc! { "dest": 1, "origin": 1 }, false);
    client.seed_index(&flights_target, seeded.clone());
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    let report = bootstrapper.run(&flights_target, &flight_specs).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.created(), 4);
    let conflicts = report.conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].name, "route_day");

    let indexes = client.indexes(&flights_target);
    assert_eq!(indexes.iter().find(|index| index.name == "route_day"), Some(&seeded));
    assert_eq!(indexes.len(), 6);
}

#[rstest]
#[tokio::test]
async fn fail_fast_stops_at_first_conflict(flights_target: CollectionTarget, flight_specs: Vec<IndexSpec>) {
    let client = InMemorySchemaClient::new();
    client.seed_index(
        &flights_target,
        ExistingIndex::new("carrier_day", doc! { "op_unique_carrier": 1, "fl_date": 1 }, true),
    );
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::FailFast);

    let result = bootstrapper.run(&flights_target, &flight_specs).await;

    assert_matches!(
        result,
        Err(BootstrapError::IndexConflict { ref namespace, ref index, .. })
            if namespace == "flightsdb.flights" && index == "carrier_day"
    );
    // Only the index ahead of the conflict was created.
    assert_eq!(client.create_index_calls(), 1);
}

/// Same keys under another name is rejected by the server with code 85 and recorded as a conflict.
#[rstest]
#[tokio::test]
async fn server_side_conflict_on_same_keys_is_recorded(flights_target: CollectionTarget, flight_specs: Vec<IndexSpec>) {
    let client = InMemorySchemaClient::new();
    client.seed_index(&flights_target, ExistingIndex::new("legacy_arr_delay", doc! { "arr_delay": 1 }, false));
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    let report = bootstrapper.run(&flights_target, &flight_specs).await.unwrap();

    let conflicts = report.conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].name, "arr_delay");
    assert_matches!(&conflicts[0].outcome, IndexOutcome::Conflict { reason } if reason.contains("code 85"));
}

/// Same name and keys, but the existing index is sparse with a partial filter: a different definition.
#[rstest]
#[tokio::test]
async fn index_with_extra_options_is_a_conflict(flights_target: CollectionTarget, flight_specs: Vec<IndexSpec>) {
    let client = InMemorySchemaClient::new();
    let seeded = ExistingIndex::new("arr_delay", doc! { "arr_delay": 1 }, false)
        .with_options(doc! { "sparse": true, "partialFilterExpression": { "arr_delay": { "$gt": 0 } } });
    client.seed_index(&flights_target, seeded.clone());
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    let report = bootstrapper.run(&flights_target, &flight_specs).await.unwrap();

    assert_eq!(report.created(), 4);
    assert_eq!(report.already_present(), 0);
    let conflicts = report.conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].name, "arr_delay");
    assert_matches!(&conflicts[0].outcome, IndexOutcome::Conflict { reason } if reason.contains("sparse"));

    let indexes = client.indexes(&flights_target);
    assert_eq!(indexes.iter().find(|index| index.name == "arr_delay"), Some(&seeded));

    let verify = bootstrapper.verify(&flights_target, &flight_specs).await.unwrap();
    let arr_delay = verify.indexes.iter().find(|index| index.name == "arr_delay").unwrap();
    assert_matches!(arr_delay.status, IndexStatus::Mismatched { .. });
}

#[rstest]
#[tokio::test]
async fn invalid_index_set_is_rejected_before_touching_the_datastore(flights_target: CollectionTarget) {
    // No expectations: any datastore call panics.
    let client = MockSchemaClient::new();
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);
    let specs = vec![
        IndexSpec::new("arr_delay", vec![IndexKey::asc("arr_delay")]),
        IndexSpec::new("arr_delay", vec![IndexKey::desc("arr_delay")]),
    ];

    let result = bootstrapper.run(&flights_target, &specs).await;

    assert_matches!(result, Err(BootstrapError::InvalidSpec(_)));
}

#[rstest]
#[tokio::test]
async fn connection_error_aborts_the_run(flights_target: CollectionTarget, flight_specs: Vec<IndexSpec>) {
    let mut client = MockSchemaClient::new();
    client
        .expect_collection_exists()
        .times(1)
        .returning(|_| Err(DatabaseError::Connection("Server selection timeout".to_string())));
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    let result = bootstrapper.run(&flights_target, &flight_specs).await;

    assert_matches!(result, Err(BootstrapError::Connection(_)));
}

/// Authorization failures are fatal even when conflicts are not.
#[rstest]
#[tokio::test]
async fn authorization_error_aborts_even_when_continuing(
    flights_target: CollectionTarget,
    flight_specs: Vec<IndexSpec>,
) {
    let mut client = MockSchemaClient::new();
    client.expect_collection_exists().times(1).returning(|_| Ok(true));
    client.expect_list_indexes().times(1).returning(|_| {
        Ok(vec![ExistingIndex::new(PRIMARY_KEY_INDEX_NAME, doc! { "_id": 1 }, false)])
    });
    client.expect_create_index().times(1).returning(|_, _| {
        Err(DatabaseError::Authorization("not authorized on flightsdb to execute command createIndexes".to_string()))
    });
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    let result = bootstrapper.run(&flights_target, &flight_specs).await;

    assert_matches!(result, Err(BootstrapError::Authorization(_)));
}

/// Another process created the collection between the existence check and the create.
#[rstest]
#[tokio::test]
async fn concurrent_collection_creation_counts_as_existing(flights_target: CollectionTarget) {
    let mut client = MockSchemaClient::new();
    client.expect_collection_exists().times(1).returning(|_| Ok(false));
    client
        .expect_create_collection()
        .times(1)
        .returning(|_| Err(DatabaseError::NamespaceExists("Collection flightsdb.flights already exists.".to_string())));
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    let outcome = bootstrapper.ensure_collection(&flights_target).await.unwrap();

    assert_eq!(outcome, CollectionOutcome::AlreadyExists);
}

#[rstest]
#[tokio::test]
async fn verify_reports_statuses_without_writing(flights_target: CollectionTarget, flight_specs: Vec<IndexSpec>) {
    let mut client = MockSchemaClient::new();
    client.expect_collection_exists().times(1).returning(|_| Ok(true));
    client.expect_list_indexes().times(1).returning(|_| {
        Ok(vec![
            ExistingIndex::new(PRIMARY_KEY_INDEX_NAME, doc! { "_id": 1 }, false),
            ExistingIndex::new(
                "uniq_route_day_flight",
                doc! { "fl_date": 1, "op_unique_carrier": 1, "op_carrier_fl_num": 1, "origin": 1, "dest": 1 },
                false,
            ),
            ExistingIndex::new("route_day", doc! { "origin": 1, "dest": 1 }, false),
        ])
    });
    client.expect_create_collection().never();
    client.expect_create_index().never();
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    let report = bootstrapper.verify(&flights_target, &flight_specs).await.unwrap();

    assert!(report.collection_exists);
    assert!(!report.is_satisfied());
    assert_eq!(report.count(&IndexStatus::Matching), 1);
    assert_eq!(report.count(&IndexStatus::Missing), 3);
    let route_day = report.indexes.iter().find(|index| index.name == "route_day").unwrap();
    assert_matches!(&route_day.status, IndexStatus::Mismatched { existing } if existing.contains("origin: 1, dest: 1"));
}

#[rstest]
#[tokio::test]
async fn verify_on_missing_collection_reports_everything_missing(
    flights_target: CollectionTarget,
    flight_specs: Vec<IndexSpec>,
) {
    let mut client = MockSchemaClient::new();
    client.expect_collection_exists().times(1).returning(|_| Ok(false));
    client.expect_list_indexes().never();
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);

    let report = bootstrapper.verify(&flights_target, &flight_specs).await.unwrap();

    assert!(!report.collection_exists);
    assert!(!report.is_satisfied());
    assert_eq!(report.count(&IndexStatus::Missing), 5);
}

#[rstest]
#[tokio::test]
async fn verify_after_bootstrap_is_satisfied(flights_target: CollectionTarget, flight_specs: Vec<IndexSpec>) {
    let client = InMemorySchemaClient::new();
    let bootstrapper = IndexBootstrapper::new(&client, ConflictPolicy::Continue);
    bootstrapper.run(&flights_target, &flight_specs).await.unwrap();

    let report = bootstrapper.verify(&flights_target, &flight_specs).await.unwrap();

    assert!(report.is_satisfied());
    assert_eq!(report.count(&IndexStatus::Matching), 5);
}
