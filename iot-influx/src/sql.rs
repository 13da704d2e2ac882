//! SQL text for the windowed dashboard read.

use iot_core::models::WindowQuery;

/// Build the SQL for `query`, oldest readings first.
pub(crate) fn window(query: &WindowQuery) -> String {
    format!(
        "SELECT * FROM {} WHERE time >= now() - interval '{} milliseconds' AND location IN ({}) ORDER BY time",
        identifier(&query.measurement),
        query.window.as_millis(),
        literal(&query.location),
    )
}

fn identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_query_reads_last_five_minutes_of_the_lab() {
        assert_eq!(
            window(&WindowQuery::default()),
            "SELECT * FROM \"readings\" WHERE time >= now() - interval '300000 milliseconds' AND location IN ('lab') ORDER BY time"
        );
    }

    #[test]
    fn quotes_are_doubled() {
        let query = WindowQuery {
            measurement: "odd\"name".to_string(),
            location: "o'clock') OR 1=1 --".to_string(),
            window: Duration::from_millis(1500),
        };
        assert_eq!(
            window(&query),
            "SELECT * FROM \"odd\"\"name\" WHERE time >= now() - interval '1500 milliseconds' AND location IN ('o''clock'') OR 1=1 --') ORDER BY time"
        );
    }
}
