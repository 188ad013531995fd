//! Optimizer binding: the two calls a schedule makes on an optimizer.

use candle_core::backprop::GradStore;
use candle_nn::Optimizer;

/// Anything whose learning rate a schedule can read and overwrite.
pub trait LrOptimizer {
    fn get_lr(&self) -> f64;
    fn set_lr(&mut self, lr: f64);
}

impl<T: LrOptimizer + ?Sized> LrOptimizer for &mut T {
    fn get_lr(&self) -> f64 {
        (**self).get_lr()
    }

    fn set_lr(&mut self, lr: f64) {
        (**self).set_lr(lr)
    }
}

impl<T: LrOptimizer + ?Sized> LrOptimizer for Box<T> {
    fn get_lr(&self) -> f64 {
        (**self).get_lr()
    }

    fn set_lr(&mut self, lr: f64) {
        (**self).set_lr(lr)
    }
}

// ── Candle adapter ──────────────────────────────────────────────────────────

/// Wraps a candle optimizer (`AdamW`, `SGD`, ...) so a schedule can drive it.
#[derive(Debug)]
pub struct CandleOptimizer<O> {
    inner: O,
}

impl<O: Optimizer> CandleOptimizer<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    /// Apply one optimiser update with whatever learning rate is currently set.
    pub fn step(&mut self, grads: &GradStore) -> candle_core::Result<()> {
        self.inner.step(grads)
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut O {
        &mut self.inner
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Optimizer> LrOptimizer for CandleOptimizer<O> {
    fn get_lr(&self) -> f64 {
        self.inner.learning_rate()
    }

    fn set_lr(&mut self, lr: f64) {
        self.inner.set_learning_rate(lr);
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use candle_core::{DType, Device, Tensor, Var};
    use candle_nn::SGD;

    fn scalar_var(value: f32) -> Var {
        Var::from_tensor(&Tensor::new(&[value], &Device::Cpu).unwrap()).unwrap()
    }

    #[test]
    fn candle_adapter_round_trips_lr() {
        let var = scalar_var(1.0);
        let mut opt = CandleOptimizer::new(SGD::new(vec![var], 1e-2).unwrap());
        assert_relative_eq!(opt.get_lr(), 1e-2);
        opt.set_lr(3e-4);
        assert_relative_eq!(opt.get_lr(), 3e-4);
        assert_relative_eq!(opt.inner().learning_rate(), 3e-4);
    }

    #[test]
    fn candle_adapter_steps_with_scheduled_lr() {
        let var = scalar_var(1.0);
        let mut opt = CandleOptimizer::new(SGD::new(vec![var.clone()], 1.0).unwrap());
        opt.set_lr(0.1);

        // d/dw (w^2) = 2w = 2 at w = 1, so w <- 1 - 0.1 * 2
        let loss = var.as_tensor().sqr().unwrap().sum_all().unwrap();
        let grads = loss.backward().unwrap();
        opt.step(&grads).unwrap();

        let w = var.as_tensor().to_dtype(DType::F32).unwrap().to_vec1::<f32>().unwrap();
        assert_relative_eq!(w[0], 0.8, epsilon = 1e-6);
    }

    fn halve<O: LrOptimizer>(mut opt: O) -> f64 {
        let lr = opt.get_lr() / 2.0;
        opt.set_lr(lr);
        opt.get_lr()
    }

    #[test]
    fn borrowed_optimizer_forwards() {
        let var = scalar_var(0.0);
        let mut opt = CandleOptimizer::new(SGD::new(vec![var], 0.5).unwrap());
        assert_relative_eq!(halve(&mut opt), 0.25);
        assert_relative_eq!(opt.get_lr(), 0.25);

        let boxed: Box<dyn LrOptimizer> = Box::new(opt);
        assert_relative_eq!(halve(boxed), 0.125);
    }
}
