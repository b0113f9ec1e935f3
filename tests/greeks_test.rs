// tests/greeks_test.rs
use bs_risk::analytics::bs_analytic::{bs_call_price, bs_put_price};
use bs_risk::analytics::greeks::{
    bs_call_delta, bs_call_rho, bs_call_theta, bs_gamma, bs_put_delta, bs_vega,
};
use bs_risk::analytics::ValuationInputs;
use bs_risk::RiskError;

const S: f64 = 100.0;
const K: f64 = 100.0;
const T: f64 = 1.0;
const R: f64 = 0.05;
const SIGMA: f64 = 0.20;

fn input_grid() -> Vec<(f64, f64, f64, f64, f64)> {
    let mut grid = Vec::new();
    for &s in &[20.0, 95.0, 100.0, 140.0] {
        for &k in &[21.0, 100.0, 105.0] {
            for &t in &[1.0 / 365.0, 90.0 / 365.0, 2.5] {
                for &r in &[0.0, 0.08] {
                    for &sigma in &[0.05, 0.35, 1.2] {
                        grid.push((s, k, t, r, sigma));
                    }
                }
            }
        }
    }
    grid
}

#[test]
fn test_reference_scenario() {
    let inputs = ValuationInputs::new(S, K, T, R, SIGMA).unwrap();
    let g = inputs.greeks();

    println!("\nCall: {}", inputs.call_price());
    println!("Put: {}", inputs.put_price());
    println!("Greeks: {:?}", g);

    let expected = [
        ("call", inputs.call_price(), 10.4506),
        ("put", inputs.put_price(), 5.5735),
        ("delta_call", g.delta_call, 0.6368),
        ("gamma", g.gamma, 0.0188),
        ("vega", g.vega, 37.52),
        ("rho_call", g.rho_call, 53.23),
    ];
    for (name, value, reference) in expected {
        assert!(
            (value - reference).abs() < 1e-2,
            "{} = {} differs from {}",
            name,
            value,
            reference
        );
    }
}

#[test]
fn test_bs_call_theta_analytic() {
    let analytic_theta = bs_call_theta(S, K, T, R, SIGMA).unwrap();
    let expected_theta = -6.414027546438197;

    let rel_error = ((analytic_theta - expected_theta) / expected_theta).abs();
    println!("\nAnalytic Theta: {}", analytic_theta);
    println!("Relative Error (Theta): {}", rel_error);

    assert!(rel_error < 1e-7, "Relative error for Theta exceeds tolerance: {}", rel_error);
}

#[test]
fn test_bs_gamma_and_vega_analytic() {
    let gamma = bs_gamma(S, K, T, R, SIGMA).unwrap();
    let vega = bs_vega(S, K, T, R, SIGMA).unwrap();

    assert!(((gamma - 0.018762017345847) / 0.018762017345847).abs() < 1e-9);
    assert!(((vega - 37.524034691693792) / 37.524034691693792).abs() < 1e-9);
}

#[test]
fn test_put_call_parity() {
    for (s, k, t, r, sigma) in input_grid() {
        let call = bs_call_price(s, k, t, r, sigma).unwrap();
        let put = bs_put_price(s, k, t, r, sigma).unwrap();
        let forward_gap = s - k * (-r * t).exp();

        let error = (call - put - forward_gap).abs();
        let scale = s.max(k);
        assert!(
            error <= 1e-9 * scale,
            "parity broken for {:?}: C-P={} vs {}",
            (s, k, t, r, sigma),
            call - put,
            forward_gap
        );
    }
}

#[test]
fn test_delta_parity_and_shared_greeks() {
    for (s, k, t, r, sigma) in input_grid() {
        let dc = bs_call_delta(s, k, t, r, sigma).unwrap();
        let dp = bs_put_delta(s, k, t, r, sigma).unwrap();
        assert!((dc - dp - 1.0).abs() < 1e-12);

        // gamma and vega from the call side equal those from the put side
        let inputs = ValuationInputs::new(s, k, t, r, sigma).unwrap();
        let g = inputs.greeks();
        assert_eq!(g.gamma, inputs.gamma());
        assert_eq!(g.vega, inputs.vega());
    }
}

#[test]
fn test_call_monotonicity() {
    let spots: Vec<f64> = (1..=60).map(|i| 40.0 + i as f64 * 2.0).collect();
    let calls: Vec<f64> = spots
        .iter()
        .map(|&s| bs_call_price(s, K, T, R, SIGMA).unwrap())
        .collect();
    assert!(calls.windows(2).all(|w| w[1] >= w[0]), "call not non-decreasing in S");

    let strikes: Vec<f64> = (1..=60).map(|i| 40.0 + i as f64 * 2.0).collect();
    let by_strike: Vec<f64> = strikes
        .iter()
        .map(|&k| bs_call_price(S, k, T, R, SIGMA).unwrap())
        .collect();
    assert!(by_strike.windows(2).all(|w| w[1] <= w[0]), "call not non-increasing in K");
}

#[test]
fn test_greeks_against_finite_differences() {
    let h = 1e-4;
    let inputs = ValuationInputs::new(S, 105.0, 90.0 / 365.0, 0.08, 0.3).unwrap();
    let price = |s: f64, t: f64, r: f64, sigma: f64| bs_call_price(s, 105.0, t, r, sigma).unwrap();
    let (s, t, r, sigma) = (S, 90.0 / 365.0, 0.08, 0.3);

    let fd_delta = (price(s + h, t, r, sigma) - price(s - h, t, r, sigma)) / (2.0 * h);
    let fd_gamma =
        (price(s + h, t, r, sigma) - 2.0 * price(s, t, r, sigma) + price(s - h, t, r, sigma)) / (h * h);
    let fd_vega = (price(s, t, r, sigma + h) - price(s, t, r, sigma - h)) / (2.0 * h);
    let fd_rho = (price(s, t, r + h, sigma) - price(s, t, r - h, sigma)) / (2.0 * h);
    // theta is the derivative with respect to calendar time, i.e. -dC/dT
    let fd_theta = -(price(s, t + h, r, sigma) - price(s, t - h, r, sigma)) / (2.0 * h);

    let g = inputs.greeks();
    println!("\nFD delta {} vs {}", fd_delta, g.delta_call);
    println!("FD gamma {} vs {}", fd_gamma, g.gamma);
    println!("FD vega {} vs {}", fd_vega, g.vega);
    println!("FD rho {} vs {}", fd_rho, g.rho_call);
    println!("FD theta {} vs {}", fd_theta, g.theta_call);

    assert!((fd_delta - g.delta_call).abs() < 1e-6);
    assert!((fd_gamma - g.gamma).abs() < 1e-4);
    assert!((fd_vega - g.vega).abs() < 1e-5);
    assert!((fd_rho - g.rho_call).abs() < 1e-5);
    assert!((fd_theta - g.theta_call).abs() < 1e-5);
}

#[test]
fn test_kernel_precondition_errors() {
    let cases = [
        bs_call_price(0.0, K, T, R, SIGMA),
        bs_put_price(S, 0.0, T, R, SIGMA),
        bs_gamma(S, K, -1.0, R, SIGMA),
        bs_vega(S, K, T, R, 0.0),
        bs_call_rho(f64::INFINITY, K, T, R, SIGMA),
    ];
    for result in cases {
        assert!(matches!(result, Err(RiskError::InvalidInput { .. })), "{:?}", result);
    }
}
