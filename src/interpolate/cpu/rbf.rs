use crate::DType;
use crate::interpolate::error::InterpolateResult;
use crate::interpolate::impl_generic::rbf::{rbf_evaluate_impl, rbf_fit_impl};
use crate::interpolate::traits::rbf::{RbfAlgorithms, RbfModel, RbfOptions};
use numr::algorithm::linalg::LinearAlgebraAlgorithms;
use numr::ops::{CompareOps, MatmulOps, ScalarOps, ShapeOps, TensorOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

impl<
    R: Runtime<DType = DType>,
    C: TensorOps<R>
        + ScalarOps<R>
        + CompareOps<R>
        + MatmulOps<R>
        + ShapeOps<R>
        + LinearAlgebraAlgorithms<R>
        + RuntimeClient<R>,
> RbfAlgorithms<R> for C
{
    fn rbf_fit(
        &self,
        points: &Tensor<R>,
        values: &Tensor<R>,
        options: &RbfOptions,
    ) -> InterpolateResult<RbfModel<R>> {
        rbf_fit_impl(self, points, values, options)
    }

    fn rbf_evaluate(&self, model: &RbfModel<R>, query: &Tensor<R>) -> InterpolateResult<Tensor<R>> {
        rbf_evaluate_impl(self, model, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::traits::rbf::RbfKernel;
    use numr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime};

    fn setup() -> (CpuDevice, CpuClient) {
        let device = CpuDevice::new();
        let client = CpuClient::new(device.clone());
        (device, client)
    }

    #[test]
    fn test_rbf_through_trait() {
        let (device, client) = setup();
        let points = Tensor::<CpuRuntime>::from_slice(
            &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            &[3, 2],
            &device,
        );
        let values = Tensor::<CpuRuntime>::from_slice(&[1.0, 2.0, 3.0], &[3], &device);

        let options = RbfOptions::new(RbfKernel::Gaussian).with_epsilon(1.5);
        let model = client.rbf_fit(&points, &values, &options).unwrap();
        assert_eq!(model.epsilon, 1.5);

        let vals: Vec<f64> = client.rbf_evaluate(&model, &points).unwrap().to_vec();
        for (v, e) in vals.iter().zip([1.0, 2.0, 3.0]) {
            assert!((v - e).abs() < 1e-8);
        }
    }
}
