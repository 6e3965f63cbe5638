//! End-to-end steady solves on a single pipe and on compressor networks.

use nalgebra::DVector;
use num_dual::Dual64;
use pn_core::{GasContext, k, m};
use pn_network::{
    Compressor, CompressorKind, DiscretizationParams, Network, NetworkBoundary, Pipe, discretize,
};
use pn_solver::{
    InitialGuess, JacobianMode, Residual, SolverConfig, SteadyCompressorSystem, SteadySystem,
    dual_jacobian, evaluate, finite_difference_jacobian, input_vec, solve_network_steady,
    solve_pipe_steady,
};

const RT: f64 = 530.0 * 280.0;

fn pipe(name: &str) -> Pipe {
    Pipe::new(name, m(100.0), m(0.5), 0.01, k(280.0))
}

fn close(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * b.abs().max(1.0)
}

#[test]
fn zero_state_residual_is_finite() {
    let d = discretize::<f64>(&pipe("p"), 5, &GasContext::default()).unwrap();
    let mut sys = SteadySystem::new(d, input_vec(5e6, 10.0));
    let zero = DVector::zeros(sys.n_state());
    let r = evaluate(&mut sys, &zero).unwrap();
    assert_eq!(r.len(), sys.n_res());
    assert!(r.iter().all(|v| v.is_finite()));
}

#[test]
fn single_pipe_converges_from_zero() {
    let config = SolverConfig {
        initial_guess: InitialGuess::Zero,
        ..SolverConfig::default()
    };
    let solution =
        solve_pipe_steady(&pipe("p"), 5, &GasContext::default(), 5e6, 10.0, &config).unwrap();

    assert!(solution.residual_norm < 1e-6);
    assert!(solution.iterations <= 5);
    assert_eq!(solution.state.len(), 9);

    let profile = &solution.pipes[0];
    for p in &profile.pressure {
        assert!(close(*p, 5e6, 1e-10), "pressure {p}");
    }
    for mom in &profile.mom {
        assert!(close(*mom, 10.0, 1e-10), "momentum {mom}");
    }
    assert!(close(profile.inlet_pressure(), 5e6, 1e-10));
    assert!(close(profile.outlet_momentum(), 10.0, 1e-10));
}

#[test]
fn finite_difference_mode_reaches_same_state() {
    let exact = solve_pipe_steady(
        &pipe("p"),
        6,
        &GasContext::default(),
        4e6,
        25.0,
        &SolverConfig::default(),
    )
    .unwrap();
    let config = SolverConfig {
        jacobian: JacobianMode::FiniteDifference,
        initial_guess: InitialGuess::Zero,
        ..SolverConfig::default()
    };
    let approx =
        solve_pipe_steady(&pipe("p"), 6, &GasContext::default(), 4e6, 25.0, &config).unwrap();
    assert!(approx.residual_norm < 1e-6);
    for (a, e) in approx.state.iter().zip(&exact.state) {
        assert!(close(*a, *e, 1e-8), "{a} vs {e}");
    }
}

#[test]
fn fixed_compression_network_raises_pressure() {
    let compressors = vec![Compressor::new("cs", CompressorKind::FixedCompression, 0, 1)];
    let network = Network::new(vec![pipe("a"), pipe("b")], compressors).unwrap();
    let boundary = NetworkBoundary {
        inlet_pressure: 5e6,
        outlet_momentum: 10.0,
        compressor_boundaries: vec![[1.0, 1.2]],
    };
    let solution = solve_network_steady(
        &network,
        &DiscretizationParams { resolution: 5 },
        &GasContext::default(),
        &boundary,
        &SolverConfig::default(),
    )
    .unwrap();

    assert!(solution.residual_norm < 1e-6);
    let (a, b) = (&solution.pipes[0], &solution.pipes[1]);
    assert!(a.pressure.iter().all(|p| close(*p, 5e6, 1e-9)));
    assert!(b.pressure.iter().all(|p| close(*p, 6e6, 1e-9)));
    assert!(a.mom.iter().chain(&b.mom).all(|v| close(*v, 10.0, 1e-9)));
}

#[test]
fn adiabatic_vane_network_converges() {
    let kappa = 1.4;
    let kind = CompressorKind::FixedPressureAdiabaticVane {
        isentropic_exponent: kappa,
    };
    let network = Network::new(
        vec![pipe("a"), pipe("b")],
        vec![Compressor::new("cs", kind, 0, 1)],
    )
    .unwrap();
    // outlet coupling: m_a = m_b * cb1 * p_a^(1/kappa), chosen so that m_a = 2 m_b
    let cb1 = 2.0 / f64::powf(5e6, 1.0 / kappa);
    let boundary = NetworkBoundary {
        inlet_pressure: 5e6,
        outlet_momentum: 10.0,
        compressor_boundaries: vec![[cb1, 4e6]],
    };
    let solution = solve_network_steady(
        &network,
        &DiscretizationParams { resolution: 4 },
        &GasContext::default(),
        &boundary,
        &SolverConfig::default(),
    )
    .unwrap();

    assert!(solution.residual_norm < 1e-6);
    let (a, b) = (&solution.pipes[0], &solution.pipes[1]);
    assert!(close(a.outlet_pressure(), 5e6, 1e-8));
    assert!(close(b.inlet_pressure(), 4e6, 1e-8));
    assert!(close(a.outlet_momentum(), 20.0, 1e-8));
    assert!(close(b.inlet_momentum(), 10.0, 1e-8));
}

#[test]
fn dual_and_plain_residuals_agree() {
    let compressors = vec![Compressor::new("cs", CompressorKind::FixedCompression, 0, 1)];
    let network = Network::new(vec![pipe("a"), pipe("b")], compressors).unwrap();
    let params = DiscretizationParams { resolution: 4 };
    let gas = GasContext::default();
    let input = [5e6, 1.0, 1.2, -10.0];
    let mut plain =
        SteadyCompressorSystem::new(network.discretize::<f64>(&params, &gas).unwrap(), &input)
            .unwrap();
    let mut dual =
        SteadyCompressorSystem::new(network.discretize::<Dual64>(&params, &gas).unwrap(), &input)
            .unwrap();

    let x = DVector::from_iterator(14, (0..14).map(|i| 20.0 + 0.5 * i as f64));
    let r_plain = evaluate(&mut plain, &x).unwrap();
    let (r_dual, jac) = dual_jacobian(&mut dual, &x).unwrap();
    assert_eq!(r_plain, r_dual);

    let fd = finite_difference_jacobian(&x, |v| evaluate(&mut plain, v), 1e-7).unwrap();
    assert_eq!(fd.shape(), jac.shape());
    for (a, e) in fd.iter().zip(jac.iter()) {
        assert!((a - e).abs() <= 1e-2 * e.abs().max(1.0), "{a} vs {e}");
    }
}

#[test]
fn unmodeled_compressor_behaves_like_independent_pipes() {
    let kind = CompressorKind::Unmodeled {
        type_tag: "XX".into(),
        model_tag: "YY".into(),
    };
    let network = Network::new(
        vec![pipe("a"), pipe("b")],
        vec![Compressor::new("cs", kind, 0, 1)],
    )
    .unwrap();
    // with default coupling the station values act as plain port inputs
    let boundary = NetworkBoundary {
        inlet_pressure: 5e6,
        outlet_momentum: 10.0,
        compressor_boundaries: vec![[-12.0, 3e6]],
    };
    let solution = solve_network_steady(
        &network,
        &DiscretizationParams { resolution: 3 },
        &GasContext::default(),
        &boundary,
        &SolverConfig::default(),
    )
    .unwrap();
    let (a, b) = (&solution.pipes[0], &solution.pipes[1]);
    assert!(close(a.inlet_pressure(), 5e6, 1e-9));
    assert!(close(a.outlet_momentum(), 12.0, 1e-9));
    assert!(close(b.inlet_pressure(), 3e6, 1e-9));
    assert!(close(b.outlet_momentum(), 10.0, 1e-9));
    assert!(close(RT * b.rho[0], 3e6, 1e-9));
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn single_pipe_profile_is_flat(
            resolution in 2_usize..12,
            p_in in 1e5_f64..1e7,
            m_out in -50.0_f64..50.0,
        ) {
            let solution = solve_pipe_steady(
                &pipe("p"),
                resolution,
                &GasContext::default(),
                p_in,
                m_out,
                &SolverConfig::default(),
            )
            .unwrap();
            let profile = &solution.pipes[0];
            prop_assert_eq!(profile.rho.len(), resolution);
            for p in &profile.pressure {
                prop_assert!(close(*p, p_in, 1e-6));
            }
            for mom in &profile.mom {
                prop_assert!(close(*mom, m_out, 1e-6));
            }
        }
    }
}
