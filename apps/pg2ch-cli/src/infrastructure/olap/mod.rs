//! OLAP targets. ClickHouse is the only one.

pub mod clickhouse;
