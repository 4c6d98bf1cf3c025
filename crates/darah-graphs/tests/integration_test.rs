//! Integration tests for darah-graphs crate.

use darah_common::test_utils::{create_temp_dir, donation_fixtures, retention_fixtures};
use darah_common::ChartImage;
use darah_data::{annual_totals, daily_averages, per_state, retention_rates, ReportSeries};
use darah_graphs::{
    chunk_states, render_report, ChartRenderer, ChartStyle, OutputTarget, STATES_PER_GRID,
};
use proptest::prelude::*;

fn fixture_series() -> ReportSeries {
    let states = donation_fixtures::state_table();
    ReportSeries {
        annual_totals: annual_totals(&states),
        daily_averages: daily_averages(&states),
        state_totals: per_state(&states, annual_totals),
        state_averages: per_state(&states, daily_averages),
        retention: retention_rates(&retention_fixtures::visits()),
    }
}

proptest! {
    #[test]
    fn prop_chunking_sizes(n in 0usize..200) {
        let states: Vec<usize> = (0..n).collect();
        let chunks = chunk_states(&states);

        prop_assert_eq!(chunks.len(), n.div_ceil(STATES_PER_GRID));
        if let Some(last) = chunks.last() {
            let expected = if n % STATES_PER_GRID == 0 { STATES_PER_GRID } else { n % STATES_PER_GRID };
            prop_assert_eq!(last.len(), expected);
        }
        let flattened: Vec<usize> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        prop_assert_eq!(flattened, states);
    }
}

#[test]
fn test_render_report_to_directory() {
    let dir = create_temp_dir();
    let renderer = ChartRenderer::new(
        ChartStyle::default(),
        OutputTarget::Directory(dir.path().join("plots")),
    );

    let artifacts = render_report(&renderer, &fixture_series()).unwrap();

    assert_eq!(artifacts.len(), 7);
    for artifact in &artifacts {
        match &artifact.image {
            ChartImage::File(path) => {
                assert!(path.exists(), "{} missing", path.display());
                let expected = if artifact.file_name.starts_with("State ") {
                    (1000, 1000)
                } else {
                    (1000, 700)
                };
                assert_eq!(image::image_dimensions(path).unwrap(), expected);
                assert_eq!(path.file_name().unwrap().to_str().unwrap(), artifact.file_name);
            }
            ChartImage::Png(_) => panic!("expected a file artifact"),
        }
    }
}

#[test]
fn test_render_report_to_memory() {
    let renderer = ChartRenderer::new(ChartStyle::default(), OutputTarget::Memory);
    let artifacts = render_report(&renderer, &fixture_series()).unwrap();

    assert_eq!(artifacts[0].caption(), "Total Annual Blood Donations");
    let sizes: Vec<(u32, u32)> = artifacts
        .iter()
        .map(|artifact| {
            let bytes = artifact.png_bytes().unwrap();
            assert_eq!(&bytes[1..4], b"PNG");
            let decoded = image::load_from_memory(&bytes).unwrap();
            (decoded.width(), decoded.height())
        })
        .collect();

    assert_eq!(
        sizes,
        vec![
            (1000, 700),
            (1000, 700),
            (1000, 1000),
            (1000, 1000),
            (1000, 1000),
            (1000, 1000),
            (1000, 700),
        ]
    );
}
