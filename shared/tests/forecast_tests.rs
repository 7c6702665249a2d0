//! Forecast integration tests
//!
//! Tests for the ripening simulator and harvest scheduler including:
//! - Mass conservation across the pipeline
//! - Monotonic maturity
//! - Capacity-bounded harvest plans
//! - Truncation to the weather horizon

use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::NaiveDate;
use proptest::prelude::*;
use shared::forecast::scheduler::{self, SchedulerState, MIN_HARVEST_KG};
use shared::forecast::{metrics, simulator};
use shared::{
    run_forecast, Controls, DailyForecastPoint, DailyWeather, ForecastInput, Pipeline,
    PipelineKind, Stage, StageCounts,
};

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn weather_from(temps: &[(f64, f64)]) -> Vec<DailyWeather> {
    temps
        .iter()
        .enumerate()
        .map(|(i, (max, min))| {
            DailyWeather::new(start_date() + chrono::Days::new(i as u64), *max, *min)
        })
        .collect()
}

fn series_from(ready: &[f64]) -> Vec<DailyForecastPoint> {
    ready
        .iter()
        .enumerate()
        .map(|(i, ready_kg)| DailyForecastPoint {
            date: start_date() + chrono::Days::new(i as u64),
            ready_kg: *ready_kg,
            gdd_cum: 0.0,
        })
        .collect()
}

fn total_population(counts: &StageCounts) -> f64 {
    counts.iter().map(|(_, value)| value).sum()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn example_input(pipeline: PipelineKind) -> ForecastInput {
        ForecastInput::new(
            StageCounts::default().with(Stage::Immature, 10.0),
            weather_from(&[
                (30.0, 20.0),
                (32.0, 22.0),
                (28.0, 18.0),
                (30.0, 20.0),
                (31.0, 21.0),
            ]),
            Controls {
                avg_weight_g: 100.0,
                num_plants: 1,
                post_harvest_loss_pct: 0.0,
                forecast_days: 5,
                gdd_base_c: 10.0,
                harvest_capacity_kg_day: 20.0,
                pipeline,
            },
        )
    }

    /// Ten immature fruit of 100 g over five warm days
    #[test]
    fn test_end_to_end_six_stage() {
        let result = run_forecast(&example_input(PipelineKind::SixStage)).unwrap();

        let cumulative: Vec<f64> = result.daily.iter().map(|d| d.gdd_cum).collect();
        let expected = [15.0, 32.0, 45.0, 60.0, 76.0];
        for (actual, expected) in cumulative.iter().zip(expected) {
            assert_abs_diff_eq!(*actual, expected, epsilon = 1e-9);
        }

        let first = result.daily.first().unwrap().ready_kg;
        let last = result.daily.last().unwrap().ready_kg;
        assert!(last > first);
        for day in &result.daily {
            assert!(day.ready_kg <= 1.0 + 1e-9);
        }
        assert_eq!(result.yield_now_kg, 0.0);
    }

    #[test]
    fn test_end_to_end_three_stage() {
        let result = run_forecast(&example_input(PipelineKind::ThreeStage)).unwrap();

        let first = result.daily.first().unwrap().ready_kg;
        let last = result.daily.last().unwrap().ready_kg;
        assert_eq!(first, 0.0);
        assert!(last > first);
        assert!(last <= 1.0 + 1e-9);
        assert!(result.total_harvest_kg() <= last + 1e-9);
    }

    /// Fixed by hand: immature 10, 15 GDD then 17 GDD, coarse pipeline
    #[test]
    fn test_three_stage_second_day_by_hand() {
        let input = example_input(PipelineKind::ThreeStage);
        let days = simulator::simulate_populations(
            &input.stage_counts,
            &input.weather,
            &input.controls,
            &Pipeline::three_stage(),
        );

        let ripening_day1 = 10.0 * 15.0 / 80.0;
        let mature_day2 = ripening_day1 * 17.0 / 55.0;
        assert_relative_eq!(days[0].populations.ripening, ripening_day1, epsilon = 1e-12);
        assert_relative_eq!(days[1].populations.mature, mature_day2, epsilon = 1e-12);
    }

    #[test]
    fn test_sellable_formula_exact() {
        assert_eq!(metrics::sellable_kg(5.0, 20.0), 4.0);
    }

    #[test]
    fn test_zero_fruit_boundary() {
        let mut input = example_input(PipelineKind::SixStage);
        input.stage_counts = StageCounts::default();
        let result = run_forecast(&input).unwrap();

        assert!(result.daily.iter().all(|d| d.ready_kg == 0.0));
        assert!(result.harvest_plan.is_empty());
        assert!(result.harvest_window.is_none());
    }

    #[test]
    fn test_mature_only_is_harvested_on_day_one() {
        let mut input = example_input(PipelineKind::SixStage);
        input.stage_counts = StageCounts::default().with(Stage::Mature, 50.0);
        input.controls.harvest_capacity_kg_day = 2.0;
        let result = run_forecast(&input).unwrap();

        // 5 kg ready from the start, 2 kg/day picked
        let picked: Vec<f64> = result.harvest_plan.iter().map(|t| t.harvest_kg).collect();
        assert_eq!(picked, vec![2.0, 2.0, 1.0]);
        assert_eq!(result.harvest_window.unwrap().end, start_date() + chrono::Days::new(2));
    }

    #[test]
    fn test_custom_threshold_suppresses_small_harvests() {
        let input = example_input(PipelineKind::ThreeStage).with_min_harvest_kg(5.0);
        let result = run_forecast(&input).unwrap();
        assert!(result.harvest_plan.is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn count_strategy() -> impl Strategy<Value = f64> {
        prop_oneof![Just(0.0), 0.0f64..500.0]
    }

    fn stage_counts_strategy() -> impl Strategy<Value = StageCounts> {
        (
            count_strategy(),
            count_strategy(),
            count_strategy(),
            count_strategy(),
            count_strategy(),
            count_strategy(),
        )
            .prop_map(|(flower, immature, breaker, ripening, pink, mature)| StageCounts {
                flower,
                immature,
                breaker,
                ripening,
                pink,
                mature,
            })
    }

    /// Daily (max, min) pairs between a frosty night and a heat wave
    fn weather_strategy() -> impl Strategy<Value = Vec<DailyWeather>> {
        prop::collection::vec((-5.0f64..45.0, 0.0f64..20.0), 1..30).prop_map(|days| {
            let temps: Vec<(f64, f64)> = days
                .into_iter()
                .map(|(max, spread)| (max, max - spread))
                .collect();
            weather_from(&temps)
        })
    }

    fn controls_strategy() -> impl Strategy<Value = Controls> {
        (
            1.0f64..500.0,
            1u32..200,
            0.0f64..100.0,
            1u32..40,
            0.0f64..20.0,
            0.5f64..100.0,
        )
            .prop_map(
                |(avg_weight_g, num_plants, loss, forecast_days, base, capacity)| Controls {
                    avg_weight_g,
                    num_plants,
                    post_harvest_loss_pct: loss,
                    forecast_days,
                    gdd_base_c: base,
                    harvest_capacity_kg_day: capacity,
                    pipeline: PipelineKind::SixStage,
                },
            )
    }

    /// Non-decreasing cumulative series built from daily increments
    fn ready_series_strategy() -> impl Strategy<Value = Vec<DailyForecastPoint>> {
        prop::collection::vec(prop_oneof![Just(0.0), 0.0f64..50.0], 0..40).prop_map(
            |increments| {
                let ready: Vec<f64> = increments
                    .iter()
                    .scan(0.0, |acc, inc| {
                        *acc += inc;
                        Some(*acc)
                    })
                    .collect();
                series_from(&ready)
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Populations are only moved, never created or lost
        #[test]
        fn prop_mass_conservation(
            counts in stage_counts_strategy(),
            weather in weather_strategy(),
            controls in controls_strategy()
        ) {
            let initial = total_population(&counts);
            let days = simulator::simulate_populations(
                &counts, &weather, &controls, &Pipeline::six_stage(),
            );
            for day in &days {
                prop_assert!((total_population(&day.populations) - initial).abs() < 1e-6);
                prop_assert_eq!(day.populations.flower, counts.flower);
            }
        }

        /// The terminal population never shrinks
        #[test]
        fn prop_monotonic_maturity(
            counts in stage_counts_strategy(),
            weather in weather_strategy(),
            controls in controls_strategy()
        ) {
            let days = simulator::simulate_populations(
                &counts, &weather, &controls, &Pipeline::six_stage(),
            );
            let mut previous = counts.mature;
            for day in &days {
                prop_assert!(day.populations.mature >= previous - 1e-9);
                prop_assert!(day.populations.immature >= 0.0);
                previous = day.populations.mature;
            }
        }

        /// Cumulative thermal time never decreases
        #[test]
        fn prop_gdd_cumulative_non_decreasing(
            weather in weather_strategy(),
            controls in controls_strategy()
        ) {
            let points = simulator::simulate(
                &StageCounts::default(), &weather, &controls, &Pipeline::six_stage(),
            );
            for pair in points.windows(2) {
                prop_assert!(pair[1].gdd_cum >= pair[0].gdd_cum);
            }
        }

        /// The run stops at whichever is shorter: weather or horizon
        #[test]
        fn prop_truncation(
            weather in weather_strategy(),
            controls in controls_strategy()
        ) {
            let points = simulator::simulate(
                &StageCounts::default().with(Stage::Immature, 1.0),
                &weather,
                &controls,
                &Pipeline::six_stage(),
            );
            let expected = weather.len().min(controls.forecast_days as usize);
            prop_assert_eq!(points.len(), expected);
        }

        /// No harvest exceeds the daily capacity or falls to the threshold
        #[test]
        fn prop_capacity_bound(
            series in ready_series_strategy(),
            capacity in 0.5f64..60.0
        ) {
            let plan = scheduler::schedule(&series, capacity, MIN_HARVEST_KG);
            for task in &plan.tasks {
                prop_assert!(task.harvest_kg <= capacity);
                prop_assert!(task.harvest_kg > MIN_HARVEST_KG);
            }
        }

        /// Backlog stays non-negative and harvested plus carried mass adds up
        #[test]
        fn prop_backlog_non_negative_and_balanced(
            series in ready_series_strategy(),
            capacity in 0.5f64..60.0
        ) {
            let mut state = SchedulerState::default();
            let mut harvested = 0.0;
            for point in &series {
                let (next, task) = scheduler::step(state, point, capacity, MIN_HARVEST_KG);
                prop_assert!(next.backlog_kg >= 0.0);
                harvested += task.map(|t| t.harvest_kg).unwrap_or(0.0);
                state = next;
            }

            let final_ready = series.last().map(|p| p.ready_kg).unwrap_or(0.0);
            prop_assert!(harvested <= final_ready + 1e-6);
            prop_assert!((harvested + state.backlog_kg - final_ready).abs() < 1e-6);
        }

        /// Dips in an external series never let the plan exceed the peak
        #[test]
        fn prop_decreasing_series_never_invents_mass(
            ready in prop::collection::vec(0.0f64..100.0, 0..30),
            capacity in 0.5f64..60.0
        ) {
            let series = series_from(&ready);
            let plan = scheduler::schedule(&series, capacity, MIN_HARVEST_KG);
            let peak = ready.iter().cloned().fold(0.0, f64::max);
            prop_assert!(plan.total_harvest_kg() <= peak + 1e-6);
            prop_assert!(plan.carryover_kg >= 0.0);
        }

        /// Window brackets the plan
        #[test]
        fn prop_window_matches_tasks(
            series in ready_series_strategy(),
            capacity in 0.5f64..60.0
        ) {
            let plan = scheduler::schedule(&series, capacity, MIN_HARVEST_KG);
            match (&plan.window, plan.tasks.first(), plan.tasks.last()) {
                (Some(window), Some(first), Some(last)) => {
                    prop_assert_eq!(window.start, first.date);
                    prop_assert_eq!(window.end, last.date);
                }
                (None, None, None) => {}
                _ => prop_assert!(false, "window and tasks disagree"),
            }
        }

        /// Sellable yield never exceeds the current yield
        #[test]
        fn prop_sellable_not_above_yield(
            yield_now in 0.0f64..10_000.0,
            loss in 0.0f64..100.0
        ) {
            let sellable = metrics::sellable_kg(yield_now, loss);
            prop_assert!(sellable <= yield_now);
            prop_assert!(sellable >= 0.0);
        }

        /// Full pipeline: valid inputs always produce a consistent result
        #[test]
        fn prop_run_forecast_consistent(
            counts in stage_counts_strategy(),
            weather in weather_strategy(),
            controls in controls_strategy()
        ) {
            let capacity = controls.harvest_capacity_kg_day;
            let input = ForecastInput::new(counts, weather, controls);
            let result = run_forecast(&input).unwrap();

            prop_assert!(result.total_harvest_kg() <= result.final_ready_kg() + 1e-6);
            prop_assert!(result.harvest_plan.iter().all(|t| t.harvest_kg <= capacity));
            prop_assert!(result.sellable_kg <= result.yield_now_kg + 1e-9);
        }
    }
}
