use chrono::{Days, NaiveDate};
use shelfcast_sales::DailySeries;

use crate::error::ForecastError;
use crate::model::DemandModel;
use crate::naive::NaiveModel;
use crate::point::{Forecast, ForecastPoint, Strategy};
use crate::trend::TrendModel;

/// Runtime knobs for the forecast engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Runtime switch for the trend model. Only effective when the `trend`
    /// feature is compiled in.
    pub trend_enabled: bool,
    /// Days averaged by the fallback model.
    pub naive_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_enabled: true,
            naive_window: NaiveModel::DEFAULT_WINDOW,
        }
    }
}

/// Produces forecasts, choosing between a trend model and the moving-average
/// fallback for every call.
///
/// Selection: the trend model runs when it is available (feature compiled in
/// and enabled at runtime) and the series has at least 2 points. Any error it
/// returns is logged and replaced by the fallback for that call only.
#[derive(Debug, Clone)]
pub struct ForecastEngine<M = TrendModel> {
    trend: M,
    naive: NaiveModel,
    config: EngineConfig,
}

impl ForecastEngine<TrendModel> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_model(TrendModel::new(), config)
    }
}

impl Default for ForecastEngine<TrendModel> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<M: DemandModel> ForecastEngine<M> {
    /// Engine with a custom model in place of the default trend model.
    pub fn with_model(trend: M, config: EngineConfig) -> Self {
        Self {
            trend,
            naive: NaiveModel::new().with_window(config.naive_window),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether the trend model may be used at all.
    pub fn trend_available(&self) -> bool {
        cfg!(feature = "trend") && self.config.trend_enabled
    }

    pub fn strategy_for(&self, series: &DailySeries) -> Strategy {
        Strategy::select(self.trend_available(), series.len())
    }

    /// Forecast `horizon_days` days after the last date of `series`.
    ///
    /// Returns exactly `horizon_days` points with non-negative, integer
    /// quantities on consecutive dates. Model failures never surface here;
    /// the only error is [`ForecastError::InvalidInput`] when the horizon
    /// would run past the last representable calendar date.
    pub fn forecast(&self, series: &DailySeries, horizon_days: usize) -> Result<Forecast, ForecastError> {
        let last_date = series.last_date();
        let Some(dates) = forecast_dates(last_date, horizon_days) else {
            return Err(ForecastError::invalid_input(format!(
                "a {horizon_days}-day horizon after {last_date} runs past the calendar"
            )));
        };

        let selected = self.strategy_for(series);
        tracing::debug!(
            product = %series.product(),
            history_days = series.len(),
            horizon_days,
            strategy = %selected,
            "forecast strategy selected"
        );

        let (strategy, fallback_reason, raw) = match selected {
            Strategy::Trend => match self.trend.predict(series, horizon_days) {
                Ok(raw) if raw.len() == horizon_days => (Strategy::Trend, None, raw),
                Ok(raw) => {
                    let reason = format!(
                        "{} returned {} values for a {horizon_days}-day horizon",
                        self.trend.name(),
                        raw.len()
                    );
                    self.fallback(series, horizon_days, reason)
                }
                Err(e) => self.fallback(series, horizon_days, e.to_string()),
            },
            Strategy::Naive => (Strategy::Naive, None, self.naive_values(series, horizon_days)),
        };

        let points = dates
            .into_iter()
            .zip(raw)
            .map(|(date, value)| ForecastPoint {
                date,
                predicted_quantity: to_quantity(value),
            })
            .collect();

        Ok(Forecast {
            product: series.product().clone(),
            strategy,
            fallback_reason,
            points,
        })
    }

    fn fallback(
        &self,
        series: &DailySeries,
        horizon_days: usize,
        reason: String,
    ) -> (Strategy, Option<String>, Vec<f64>) {
        tracing::warn!(
            product = %series.product(),
            model = self.trend.name(),
            error = %reason,
            "trend model failed; using moving-average fallback"
        );
        (
            Strategy::Naive,
            Some(reason),
            self.naive_values(series, horizon_days),
        )
    }

    fn naive_values(&self, series: &DailySeries, horizon_days: usize) -> Vec<f64> {
        vec![self.naive.level(series); horizon_days]
    }
}

/// The `horizon_days` dates following `last_date`, or `None` if any of them
/// is past the end of the calendar.
pub(crate) fn forecast_dates(last_date: NaiveDate, horizon_days: usize) -> Option<Vec<NaiveDate>> {
    (1..=horizon_days as u64)
        .map(|offset| last_date.checked_add_days(Days::new(offset)))
        .collect()
}

/// Clip to zero and round half to even.
fn to_quantity(value: f64) -> u64 {
    if !value.is_finite() {
        return 0;
    }
    value.max(0.0).round_ties_even() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfcast_core::ProductId;

    fn milk() -> ProductId {
        ProductId::new("Milk").unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn series(quantities: Vec<u64>) -> DailySeries {
        DailySeries::from_quantities(milk(), day(1), quantities).unwrap()
    }

    struct FailingModel;

    impl DemandModel for FailingModel {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn predict(&self, _: &DailySeries, _: usize) -> Result<Vec<f64>, ForecastError> {
            Err(ForecastError::model_failure("singular matrix"))
        }
    }

    struct ShortModel;

    impl DemandModel for ShortModel {
        fn name(&self) -> &'static str {
            "short"
        }

        fn predict(&self, _: &DailySeries, _: usize) -> Result<Vec<f64>, ForecastError> {
            Ok(vec![1.0])
        }
    }

    struct NegativeModel;

    impl DemandModel for NegativeModel {
        fn name(&self) -> &'static str {
            "negative"
        }

        fn predict(&self, _: &DailySeries, horizon: usize) -> Result<Vec<f64>, ForecastError> {
            Ok(vec![-3.7; horizon])
        }
    }

    #[test]
    fn single_point_uses_constant_fallback() {
        let engine = ForecastEngine::new(EngineConfig::default());
        let s = DailySeries::from_quantities(milk(), day(10), vec![5]).unwrap();

        let forecast = engine.forecast(&s, 3).unwrap();
        assert_eq!(forecast.strategy, Strategy::Naive);
        assert!(!forecast.fell_back());
        assert_eq!(
            forecast.points,
            vec![
                ForecastPoint { date: day(11), predicted_quantity: 5 },
                ForecastPoint { date: day(12), predicted_quantity: 5 },
                ForecastPoint { date: day(13), predicted_quantity: 5 },
            ]
        );
    }

    #[test]
    fn empty_series_forecasts_zeros() {
        let engine = ForecastEngine::new(EngineConfig::default());
        let s = DailySeries::empty(milk(), day(20));

        let forecast = engine.forecast(&s, 4).unwrap();
        assert_eq!(forecast.horizon(), 4);
        assert!(forecast.points.iter().all(|p| p.predicted_quantity == 0));
        assert_eq!(forecast.points[0].date, day(21));
        assert_eq!(forecast.points[3].date, day(24));
    }

    #[test]
    fn trend_is_preferred_when_available() {
        let engine = ForecastEngine::new(EngineConfig::default());
        let forecast = engine.forecast(&series(vec![2, 4, 6, 8, 10]), 2).unwrap();
        if cfg!(feature = "trend") {
            assert_eq!(forecast.strategy, Strategy::Trend);
            let values: Vec<u64> = forecast.points.iter().map(|p| p.predicted_quantity).collect();
            assert_eq!(values, vec![12, 14]);
        } else {
            assert_eq!(forecast.strategy, Strategy::Naive);
        }
    }

    #[test]
    fn disabled_trend_uses_fallback() {
        let engine = ForecastEngine::new(EngineConfig {
            trend_enabled: false,
            ..EngineConfig::default()
        });
        assert!(!engine.trend_available());

        // Mean of last 7 of 1..=8 is 5.
        let forecast = engine.forecast(&series((1..=8).collect()), 3).unwrap();
        assert_eq!(forecast.strategy, Strategy::Naive);
        assert!(forecast.points.iter().all(|p| p.predicted_quantity == 5));
    }

    #[test]
    fn model_failure_falls_back_without_propagating() {
        let engine = ForecastEngine::with_model(FailingModel, EngineConfig::default());
        let forecast = engine.forecast(&series(vec![4, 4, 4, 4]), 5).unwrap();

        assert_eq!(forecast.horizon(), 5);
        if cfg!(feature = "trend") {
            assert_eq!(forecast.strategy, Strategy::Naive);
            assert!(forecast.fallback_reason.as_deref().unwrap().contains("singular matrix"));
        }
        assert!(forecast.points.iter().all(|p| p.predicted_quantity == 4));
    }

    #[test]
    fn wrong_length_output_falls_back() {
        let engine = ForecastEngine::with_model(ShortModel, EngineConfig::default());
        let forecast = engine.forecast(&series(vec![2, 2, 2]), 4).unwrap();
        assert_eq!(forecast.horizon(), 4);
        assert_eq!(forecast.strategy, Strategy::Naive);
    }

    #[cfg(feature = "trend")]
    #[test]
    fn negative_predictions_are_clipped() {
        let engine = ForecastEngine::with_model(NegativeModel, EngineConfig::default());
        let forecast = engine.forecast(&series(vec![2, 1]), 3).unwrap();
        assert!(forecast.points.iter().all(|p| p.predicted_quantity == 0));
    }

    #[test]
    fn zero_horizon_is_empty() {
        let forecast = ForecastEngine::new(EngineConfig::default()).forecast(&series(vec![1, 2, 3]), 0).unwrap();
        assert!(forecast.points.is_empty());
    }

    #[test]
    fn horizon_past_calendar_end_is_rejected() {
        let engine = ForecastEngine::new(EngineConfig::default());
        let near_end = NaiveDate::MAX.checked_sub_days(Days::new(2)).unwrap();
        let s = DailySeries::from_quantities(milk(), near_end, vec![1, 2, 3]).unwrap();
        assert_eq!(s.last_date(), NaiveDate::MAX);

        let err = engine.forecast(&s, 5).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
        // A zero-day horizon needs no further dates.
        assert!(engine.forecast(&s, 0).unwrap().points.is_empty());
    }

    #[test]
    fn horizon_reaching_calendar_end_is_complete() {
        let engine = ForecastEngine::new(EngineConfig::default());
        let start = NaiveDate::MAX.checked_sub_days(Days::new(7)).unwrap();
        let s = DailySeries::from_quantities(milk(), start, vec![3, 3]).unwrap();

        let forecast = engine.forecast(&s, 6).unwrap();
        assert_eq!(forecast.horizon(), 6);
        assert_eq!(forecast.points[5].date, NaiveDate::MAX);
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(to_quantity(2.5), 2);
        assert_eq!(to_quantity(3.5), 4);
        assert_eq!(to_quantity(-0.4), 0);
        assert_eq!(to_quantity(f64::NAN), 0);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: exactly `horizon` points on the consecutive days after the series.
            #[test]
            fn forecast_has_horizon_consecutive_points(
                quantities in prop::collection::vec(0u64..1_000, 1..120),
                horizon in 0usize..60,
                trend_enabled in any::<bool>(),
            ) {
                let engine = ForecastEngine::new(EngineConfig {
                    trend_enabled,
                    ..EngineConfig::default()
                });
                let s = series(quantities);
                let forecast = engine.forecast(&s, horizon).unwrap();

                prop_assert_eq!(forecast.points.len(), horizon);
                for (i, point) in forecast.points.iter().enumerate() {
                    prop_assert_eq!(point.date, s.last_date() + Days::new(i as u64 + 1));
                }
            }

            /// Property: same input, same output.
            #[test]
            fn forecast_is_idempotent(
                quantities in prop::collection::vec(0u64..1_000, 0..60),
                horizon in 1usize..30,
            ) {
                let engine = ForecastEngine::new(EngineConfig::default());
                let s = if quantities.is_empty() {
                    DailySeries::empty(milk(), day(1))
                } else {
                    series(quantities)
                };
                prop_assert_eq!(engine.forecast(&s, horizon).unwrap(), engine.forecast(&s, horizon).unwrap());
            }
        }
    }
}
