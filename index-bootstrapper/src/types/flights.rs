//! Built-in index set for the flight records collection.
//!
//! Indexes:
//! - `{ "_id": 1 }` - Primary key (automatic, left untouched)
//! - `uniq_route_day_flight` - One flight of one carrier on one route and day
//! - `carrier_day` - Carrier queries by day
//! - `origin_day` - Departures from an airport by day
//! - `route_day` - Route queries by day
//! - `arr_delay` - Arrival delay ranges and sorting

use super::index::{IndexKey, IndexSpec};

pub const FLIGHTS_DATABASE: &str = "flightsdb";
pub const FLIGHTS_COLLECTION: &str = "flights";

/// The five secondary indexes of `flightsdb.flights`, in creation order.
///
/// `uniq_route_day_flight` is non-unique on purpose; the `uniq_` prefix is historical.
pub fn flight_index_specs() -> Vec<IndexSpec> {
    vec![
        IndexSpec::new(
            "uniq_route_day_flight",
            vec![
                IndexKey::asc("fl_date"),
                IndexKey::asc("op_unique_carrier"),
                IndexKey::asc("op_carrier_fl_num"),
                IndexKey::asc("origin"),
                IndexKey::asc("dest"),
            ],
        )
        .with_unique(false),
        IndexSpec::new("carrier_day", vec![IndexKey::asc("op_unique_carrier"), IndexKey::asc("fl_date")]),
        IndexSpec::new("origin_day", vec![IndexKey::asc("origin"), IndexKey::asc("fl_date")]),
        IndexSpec::new("route_day", vec![IndexKey::asc("origin"), IndexKey::asc("dest"), IndexKey::asc("fl_date")]),
        IndexSpec::new("arr_delay", vec![IndexKey::asc("arr_delay")]),
    ]
}
