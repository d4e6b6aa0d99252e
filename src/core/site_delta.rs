use crate::core::bucket_reducer::ReducedMap;
use crate::core::keys::{BucketKey, HourKey, SiteId};
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::debug;

/// The hourly generation sums of one site, earliest hour first.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteSeries {
    site: SiteId,
    points: Vec<(HourKey, f64)>,
}

impl SiteSeries {
    pub fn site(&self) -> &SiteId {
        &self.site
    }

    pub fn points(&self) -> &[(HourKey, f64)] {
        &self.points
    }

    /// Change in generation from the previous hour of this site. The earliest hour has no
    /// predecessor and gets a delta of zero.
    pub fn deltas(&self) -> Vec<f64> {
        std::iter::once(0.0)
            .chain(
                self.points
                    .iter()
                    .tuple_windows()
                    .map(|((_, previous), (_, current))| current - previous),
            )
            .take(self.points.len())
            .collect()
    }
}

/// Split summed generation into one chronologically sorted series per site.
///
/// Sites are whatever appears in the keys, listed in the order they were first seen.
pub fn site_series(summed_generation: &ReducedMap) -> Vec<SiteSeries> {
    let mut by_site: IndexMap<&SiteId, Vec<(HourKey, f64)>> = IndexMap::new();
    for (key, sum) in summed_generation {
        by_site
            .entry(key.site())
            .or_default()
            .push((key.hour_key().clone(), *sum));
    }

    by_site
        .into_iter()
        .map(|(site, points)| SiteSeries {
            site: site.clone(),
            points: points
                .into_iter()
                .sorted_by(|(a, _), (b, _)| a.cmp(b))
                .collect(),
        })
        .collect()
}

/// Difference of each hour's generation sum from the same site's previous hour.
///
/// Every site is handled on its own, so a delta never spans two sites.
pub fn generation_deltas_by_site(summed_generation: &ReducedMap) -> ReducedMap {
    let all_series = site_series(summed_generation);
    debug!(sites = all_series.len(), "calculating generation deltas per site");

    all_series
        .iter()
        .flat_map(|series| {
            series
                .points()
                .iter()
                .zip(series.deltas())
                .map(move |((hour_key, _), delta)| {
                    (BucketKey::new(hour_key.clone(), series.site().clone()), delta)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keys::bucket_key;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_deltas_follow_chronological_order() {
        let summed_generation = ReducedMap::from([
            (bucket_key("2024-01-01 11", "A"), 12.0),
            (bucket_key("2024-01-01 09", "A"), 10.0),
            (bucket_key("2024-01-01 10", "A"), 15.0),
        ]);

        let deltas = generation_deltas_by_site(&summed_generation);

        assert_eq!(deltas[&bucket_key("2024-01-01 09", "A")], 0.0);
        assert_relative_eq!(deltas[&bucket_key("2024-01-01 10", "A")], 5.0);
        assert_relative_eq!(deltas[&bucket_key("2024-01-01 11", "A")], -3.0);
    }

    #[rstest]
    fn test_deltas_never_cross_sites() {
        let summed_generation = ReducedMap::from([
            (bucket_key("2024-01-01 09", "A"), 10.0),
            (bucket_key("2024-01-01 09", "B"), 100.0),
            (bucket_key("2024-01-01 10", "A"), 11.0),
            (bucket_key("2024-01-01 10", "B"), 90.0),
            (bucket_key("2024-01-01 10", "north-field"), 4.0),
            (bucket_key("2024-01-01 11", "north-field"), 6.5),
            (bucket_key("2024-01-01 12", "D"), 3.0),
        ]);

        let deltas = generation_deltas_by_site(&summed_generation);

        assert_eq!(deltas.len(), summed_generation.len());
        assert_eq!(deltas[&bucket_key("2024-01-01 09", "A")], 0.0);
        assert_eq!(deltas[&bucket_key("2024-01-01 09", "B")], 0.0);
        assert_eq!(deltas[&bucket_key("2024-01-01 10", "north-field")], 0.0);
        assert_eq!(deltas[&bucket_key("2024-01-01 12", "D")], 0.0);
        assert_relative_eq!(deltas[&bucket_key("2024-01-01 10", "A")], 1.0);
        assert_relative_eq!(deltas[&bucket_key("2024-01-01 10", "B")], -10.0);
        assert_relative_eq!(deltas[&bucket_key("2024-01-01 11", "north-field")], 2.5);
    }

    #[rstest]
    fn test_first_hour_across_midnight_and_month_end() {
        let summed_generation = ReducedMap::from([
            (bucket_key("2024-02-01 00", "A"), 8.0),
            (bucket_key("2024-01-31 23", "A"), 6.0),
        ]);

        let deltas = generation_deltas_by_site(&summed_generation);

        assert_eq!(deltas[&bucket_key("2024-01-31 23", "A")], 0.0);
        assert_relative_eq!(deltas[&bucket_key("2024-02-01 00", "A")], 2.0);
    }

    #[rstest]
    fn test_site_series_are_sorted_and_in_first_seen_site_order() {
        let summed_generation = ReducedMap::from([
            (bucket_key("2024-01-01 10", "B"), 2.0),
            (bucket_key("2024-01-01 10", "A"), 4.0),
            (bucket_key("2024-01-01 09", "B"), 1.0),
        ]);

        let series = site_series(&summed_generation);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].site().as_str(), "B");
        assert_eq!(
            series[0]
                .points()
                .iter()
                .map(|(hour_key, sum)| (hour_key.as_str(), *sum))
                .collect::<Vec<_>>(),
            vec![("2024-01-01 09", 1.0), ("2024-01-01 10", 2.0)]
        );
        assert_eq!(series[1].site().as_str(), "A");
        assert_eq!(series[1].deltas(), vec![0.0]);
    }

    #[rstest]
    fn test_no_generation_gives_no_deltas() {
        assert!(generation_deltas_by_site(&ReducedMap::new()).is_empty());
    }
}
