//! `RelationalSource` backed by the post-import PostgreSQL schema

use postgres::{Client, Row};

use super::relational::{EdgeRow, MergeMapRow, MergedStopRow, RelationalSource, TransferRow};

const STOPS_QUERY: &str = "SELECT stop_id, stop_name, \
     stop_lat::double precision AS stop_lat, \
     stop_lon::double precision AS stop_lon, \
     stop_lat_snapped::double precision AS stop_lat_snapped, \
     stop_lon_snapped::double precision AS stop_lon_snapped \
     FROM gtfs.stops_merged";

const EDGES_QUERY: &str = "SELECT from_stop, to_stop, travel_cost::bigint AS travel_cost, route_id \
     FROM gtfs.edges";

const MERGE_MAP_QUERY: &str = "SELECT stop_id, merged_stop_id FROM gtfs.stop_merge_map";

const TRANSFERS_QUERY: &str = "SELECT from_stop_id, to_stop_id, \
     transfer_type::integer AS transfer_type, \
     min_transfer_time::bigint AS min_transfer_time \
     FROM gtfs.transfers";

fn query_rows<T>(
    client: &mut Client,
    sql: &str,
    map: impl Fn(&Row) -> Result<T, postgres::Error>,
) -> Result<Vec<T>, postgres::Error> {
    client.query(sql, &[])?.iter().map(map).collect()
}

impl RelationalSource for Client {
    type Error = postgres::Error;

    fn merged_stops(&mut self) -> Result<Vec<MergedStopRow>, Self::Error> {
        query_rows(self, STOPS_QUERY, |row| {
            Ok(MergedStopRow {
                stop_id: row.try_get("stop_id")?,
                stop_name: row.try_get("stop_name")?,
                stop_lat: row.try_get::<_, Option<f64>>("stop_lat")?.unwrap_or(f64::NAN),
                stop_lon: row.try_get::<_, Option<f64>>("stop_lon")?.unwrap_or(f64::NAN),
                stop_lat_snapped: row.try_get("stop_lat_snapped")?,
                stop_lon_snapped: row.try_get("stop_lon_snapped")?,
            })
        })
    }

    fn edges(&mut self) -> Result<Vec<EdgeRow>, Self::Error> {
        query_rows(self, EDGES_QUERY, |row| {
            Ok(EdgeRow {
                from_stop: row.try_get("from_stop")?,
                to_stop: row.try_get("to_stop")?,
                travel_cost: row.try_get("travel_cost")?,
                route_id: row.try_get("route_id")?,
            })
        })
    }

    fn stop_merge_map(&mut self) -> Result<Vec<MergeMapRow>, Self::Error> {
        query_rows(self, MERGE_MAP_QUERY, |row| {
            Ok(MergeMapRow {
                stop_id: row.try_get("stop_id")?,
                merged_stop_id: row.try_get("merged_stop_id")?,
            })
        })
    }

    fn transfers(&mut self) -> Result<Vec<TransferRow>, Self::Error> {
        query_rows(self, TRANSFERS_QUERY, |row| {
            Ok(TransferRow {
                from_stop_id: row.try_get("from_stop_id")?,
                to_stop_id: row.try_get("to_stop_id")?,
                transfer_type: row.try_get("transfer_type")?,
                min_transfer_time: row.try_get("min_transfer_time")?,
            })
        })
    }
}
