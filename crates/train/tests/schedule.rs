use approx::assert_relative_eq;
use candle_core::{Device, Tensor, Var};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};

use lrsched_common::{LrSchedulerConfig, ScheduleError};
use lrsched_train::{
    build_scheduler, CandleOptimizer, InverseSqrtSchedule, LrOptimizer, LrScheduler,
    SchedulerState,
};

fn adamw(lr: f64) -> (Var, CandleOptimizer<AdamW>) {
    let var = Var::from_tensor(&Tensor::new(&[2.0f32, -1.0], &Device::Cpu).unwrap()).unwrap();
    let opt = AdamW::new(
        vec![var.clone()],
        ParamsAdamW {
            lr,
            ..Default::default()
        },
    )
    .unwrap();
    (var, CandleOptimizer::new(opt))
}

#[test]
fn drives_candle_adamw_through_a_short_run() {
    let config = LrSchedulerConfig {
        lr: vec![1e-3],
        warmup_updates: 8,
        warmup_init_lr: 0.0,
        hidden_layer_size: 64,
    };
    let (var, opt) = adamw(1.0);
    let mut sched = InverseSqrtSchedule::new(&config, opt).unwrap();
    assert_relative_eq!(sched.optimizer().get_lr(), sched.initial_lr());

    let mut rates = Vec::new();
    for num_updates in 1..=32u64 {
        let loss = var.as_tensor().sqr().unwrap().sum_all().unwrap();
        let grads = loss.backward().unwrap();
        sched.optimizer_mut().step(&grads).unwrap();
        rates.push(sched.step_update(num_updates));
        assert_eq!(sched.optimizer().inner().learning_rate(), *rates.last().unwrap());
    }

    let peak = rates
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i as u64 + 1)
        .unwrap();
    assert_eq!(peak, sched.crossover());
    assert_relative_eq!(rates[7], 8f64.powf(-0.5) / 8.0, max_relative = 1e-12);
}

#[test]
fn epoch_hook_and_checkpoint_via_registry() {
    let (_var, mut opt) = adamw(1.0);
    let config = LrSchedulerConfig::default();

    let saved = {
        let mut sched = build_scheduler("vaswani", &config, &mut opt).unwrap();
        let lr = sched.step_update(1234);
        assert_eq!(sched.step(0, Some(5.0)), lr);
        assert_eq!(sched.step(1, Some(4.0)), lr);
        assert_eq!(sched.step(2, None), lr);
        serde_json::to_string(&sched.state()).unwrap()
    };

    let state: SchedulerState = serde_json::from_str(&saved).unwrap();
    assert_eq!(state.best, Some(4.0));

    let mut resumed = build_scheduler("vaswani", &config, &mut opt).unwrap();
    resumed.load_state(state);
    assert_eq!(resumed.state().best, Some(4.0));
}

#[test]
fn fixed_schedule_lists_are_refused() {
    let (_var, opt) = adamw(1.0);
    let config = LrSchedulerConfig {
        lr: vec![1e-3, 1e-4, 1e-5],
        ..Default::default()
    };
    match build_scheduler("vaswani", &config, opt) {
        Err(ScheduleError::Configuration(_)) => {}
        Err(other) => panic!("expected configuration error, got {other}"),
        Ok(_) => panic!("multi-lr config accepted"),
    }
}
