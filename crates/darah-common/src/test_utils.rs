//! Test utilities and fixtures shared by the Darah Report crates.

use crate::{DailyCount, RetentionVisit};
use chrono::NaiveDate;

/// Shorthand for a calendar date in fixtures
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Daily donation fixtures
pub mod donation_fixtures {
    use super::*;

    /// One record per day for `days` days starting at `start`, each with `count`.
    pub fn constant_days(region: &str, start: NaiveDate, days: u32, count: u64) -> Vec<DailyCount> {
        start
            .iter_days()
            .take(days as usize)
            .map(|d| DailyCount::new(d, region, count))
            .collect()
    }

    /// Small state table: national sentinel first, then five states over two years.
    pub fn state_table() -> Vec<DailyCount> {
        let mut rows = Vec::new();
        for (region, count) in [
            ("Malaysia", 50),
            ("Johor", 10),
            ("Kedah", 7),
            ("Kelantan", 5),
            ("Melaka", 3),
            ("Pahang", 25),
        ] {
            rows.push(DailyCount::new(date(2022, 1, 1), region, count));
            rows.push(DailyCount::new(date(2022, 12, 31), region, count));
            rows.push(DailyCount::new(date(2023, 1, 1), region, count * 2));
            rows.push(DailyCount::new(date(2023, 1, 10), region, count * 2));
        }
        rows
    }

    /// The same table as CSV text with the upstream column layout
    pub fn state_table_csv() -> String {
        let mut csv = String::from("date,state,daily,blood_a,blood_b\n");
        for row in state_table() {
            csv.push_str(&format!("{},{},{},0,0\n", row.date, row.region, row.count));
        }
        csv
    }
}

/// Retention fixtures
pub mod retention_fixtures {
    use super::*;

    /// Four donors across 2021..=2023.
    ///
    /// * `a`: 2021 and 2022 (repeat)
    /// * `b`: 2021 only
    /// * `c`: 2022 twice and 2023 (repeat)
    /// * `d`: 2023 only
    pub fn visits() -> Vec<RetentionVisit> {
        vec![
            RetentionVisit::new("a", date(2021, 3, 1)),
            RetentionVisit::new("a", date(2022, 3, 1)),
            RetentionVisit::new("b", date(2021, 6, 1)),
            RetentionVisit::new("c", date(2022, 1, 5)),
            RetentionVisit::new("c", date(2022, 8, 5)),
            RetentionVisit::new("c", date(2023, 2, 5)),
            RetentionVisit::new("d", date(2023, 7, 7)),
        ]
    }
}

/// Canned HTTP responses served from localhost
pub mod http_fixtures {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// A request as received by [`serve_responses`]
    #[derive(Debug, Clone)]
    pub struct CapturedRequest {
        pub method: String,
        pub path: String,
        pub body: Vec<u8>,
    }

    impl CapturedRequest {
        pub fn body_text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    /// Answer one connection per `(status, body)` pair, in order.
    ///
    /// Returns the base URL (`http://127.0.0.1:PORT`) and a handle that yields
    /// the captured requests once every response has been sent.
    pub async fn serve_responses(
        responses: Vec<(u16, String)>,
    ) -> (String, JoinHandle<Vec<CapturedRequest>>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener address");

        let handle = tokio::spawn(async move {
            let mut captured = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.expect("accept");
                let request = read_request(&mut stream).await;
                captured.push(request);

                let reason = if status < 400 { "OK" } else { "Error" };
                let head = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                stream.write_all(head.as_bytes()).await.expect("write head");
                stream.write_all(body.as_bytes()).await.expect("write body");
                let _ = stream.shutdown().await;
            }
            captured
        });

        (format!("http://{addr}"), handle)
    }

    async fn read_request(stream: &mut tokio::net::TcpStream) -> CapturedRequest {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = stream.read(&mut chunk).await.expect("read request");
            if n == 0 {
                break buf.len();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
        let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
        let method = request_line.next().unwrap_or_default().to_string();
        let path = request_line.next().unwrap_or_default().to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = buf[header_end.min(buf.len())..].to_vec();
        while body.len() < content_length {
            let n = stream.read(&mut chunk).await.expect("read body");
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }

        CapturedRequest { method, path, body }
    }
}
