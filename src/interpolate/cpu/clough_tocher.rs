use crate::interpolate::error::InterpolateResult;
use crate::interpolate::impl_generic::clough_tocher::{
    clough_tocher_evaluate_impl, clough_tocher_fit_impl,
};
use crate::interpolate::traits::clough_tocher::{CloughTocher2D, CloughTocher2DAlgorithms};
use numr::runtime::cpu::{CpuClient, CpuRuntime};
use numr::tensor::Tensor;

impl CloughTocher2DAlgorithms<CpuRuntime> for CpuClient {
    fn clough_tocher_fit(
        &self,
        points: &Tensor<CpuRuntime>,
        values: &Tensor<CpuRuntime>,
        fill_value: f64,
    ) -> InterpolateResult<CloughTocher2D<CpuRuntime>> {
        clough_tocher_fit_impl(self, points, values, fill_value)
    }

    fn clough_tocher_evaluate(
        &self,
        ct: &CloughTocher2D<CpuRuntime>,
        xi: &Tensor<CpuRuntime>,
    ) -> InterpolateResult<Tensor<CpuRuntime>> {
        clough_tocher_evaluate_impl(self, ct, xi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numr::runtime::cpu::CpuDevice;

    #[test]
    fn test_fit_once_evaluate_twice() {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());

        let coords = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.4, 0.6];
        let plane: Vec<f64> = coords.chunks(2).map(|c| 1.0 + c[0] - 3.0 * c[1]).collect();
        let points = Tensor::<CpuRuntime>::from_slice(&coords, &[5, 2], &device);
        let values = Tensor::<CpuRuntime>::from_slice(&plane, &[5], &device);

        let ct = client.clough_tocher_fit(&points, &values, -9.0).unwrap();
        assert_eq!(ct.gradients.shape(), &[5, 2]);

        let inside = Tensor::<CpuRuntime>::from_slice(&[0.25, 0.75, 0.9, 0.1], &[2, 2], &device);
        let out: Vec<f64> = client.clough_tocher_evaluate(&ct, &inside).unwrap().to_vec::<f64>();
        assert!((out[0] - (1.0 + 0.25 - 2.25)).abs() < 1e-10);
        assert!((out[1] - (1.0 + 0.9 - 0.3)).abs() < 1e-10);

        let outside = Tensor::<CpuRuntime>::from_slice(&[1.5, 0.5], &[1, 2], &device);
        let out: Vec<f64> = client.clough_tocher_evaluate(&ct, &outside).unwrap().to_vec::<f64>();
        assert_eq!(out, vec![-9.0]);
    }
}
