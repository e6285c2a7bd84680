//! Limited-memory BFGS minimizer over flat parameter vectors.
//!
//! Two-loop recursion for the search direction and a backtracking line
//! search enforcing the Armijo condition. Correction pairs with non-positive
//! curvature are discarded so the implicit inverse Hessian stays positive
//! definite.

use ndarray::Array1;
use std::collections::VecDeque;

/// Why the minimizer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// Gradient max-norm fell below the tolerance
    Converged,
    /// Iteration budget exhausted
    MaxIterations,
    /// Line search could not decrease the objective
    Stalled,
}

/// Outcome of a minimization run
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub solution: Array1<f64>,
    pub objective: f64,
    pub iterations: usize,
    pub status: ConvergenceStatus,
}

/// L-BFGS settings
#[derive(Debug, Clone)]
pub struct Lbfgs {
    max_iter: usize,
    tol: f64,
    history: usize,
}

const ARMIJO_C1: f64 = 1e-4;
const MAX_LINE_SEARCH_STEPS: usize = 40;

impl Lbfgs {
    /// `tol` is compared against the largest absolute gradient component.
    pub fn new(max_iter: usize, tol: f64, history: usize) -> Self {
        Self {
            max_iter,
            tol,
            history: history.max(1),
        }
    }

    /// Minimize `objective`, which returns the value and gradient at a point.
    pub fn minimize<F>(&self, x0: Array1<f64>, mut objective: F) -> OptimizationResult
    where
        F: FnMut(&Array1<f64>) -> (f64, Array1<f64>),
    {
        let mut x = x0;
        let (mut fx, mut grad) = objective(&x);
        let mut s_hist: VecDeque<Array1<f64>> = VecDeque::with_capacity(self.history);
        let mut y_hist: VecDeque<Array1<f64>> = VecDeque::with_capacity(self.history);

        for iter in 0..self.max_iter {
            if max_abs(&grad) <= self.tol {
                return OptimizationResult {
                    solution: x,
                    objective: fx,
                    iterations: iter,
                    status: ConvergenceStatus::Converged,
                };
            }

            let mut direction = two_loop(&grad, &s_hist, &y_hist);
            let mut slope = grad.dot(&direction);
            if slope >= 0.0 {
                // Not a descent direction; restart from steepest descent
                s_hist.clear();
                y_hist.clear();
                direction = -&grad;
                slope = grad.dot(&direction);
            }

            // First step without history is scaled to unit length
            let mut step = if s_hist.is_empty() {
                (1.0 / norm(&direction)).min(1.0)
            } else {
                1.0
            };

            let mut accepted = None;
            for _ in 0..MAX_LINE_SEARCH_STEPS {
                let candidate = &x + &(step * &direction);
                let (f_new, g_new) = objective(&candidate);
                if f_new.is_finite() && f_new <= fx + ARMIJO_C1 * step * slope {
                    accepted = Some((candidate, f_new, g_new));
                    break;
                }
                step *= 0.5;
            }

            let Some((x_new, f_new, g_new)) = accepted else {
                return OptimizationResult {
                    solution: x,
                    objective: fx,
                    iterations: iter,
                    status: ConvergenceStatus::Stalled,
                };
            };

            let s = &x_new - &x;
            let y = &g_new - &grad;
            if s.dot(&y) > 1e-10 {
                if s_hist.len() == self.history {
                    s_hist.pop_front();
                    y_hist.pop_front();
                }
                s_hist.push_back(s);
                y_hist.push_back(y);
            }

            x = x_new;
            fx = f_new;
            grad = g_new;
        }

        let status = if max_abs(&grad) <= self.tol {
            ConvergenceStatus::Converged
        } else {
            ConvergenceStatus::MaxIterations
        };
        OptimizationResult {
            solution: x,
            objective: fx,
            iterations: self.max_iter,
            status,
        }
    }
}

/// Approximate -H^-1 * grad from the stored correction pairs
fn two_loop(
    grad: &Array1<f64>,
    s_hist: &VecDeque<Array1<f64>>,
    y_hist: &VecDeque<Array1<f64>>,
) -> Array1<f64> {
    let mut q = -grad;
    if s_hist.is_empty() {
        return q;
    }

    let k = s_hist.len();
    let mut alpha = vec![0.0; k];
    let rho: Vec<f64> = s_hist
        .iter()
        .zip(y_hist.iter())
        .map(|(s, y)| 1.0 / y.dot(s))
        .collect();

    for i in (0..k).rev() {
        alpha[i] = rho[i] * s_hist[i].dot(&q);
        q.scaled_add(-alpha[i], &y_hist[i]);
    }

    let (s_last, y_last) = (&s_hist[k - 1], &y_hist[k - 1]);
    let gamma = s_last.dot(y_last) / y_last.dot(y_last);
    let mut r = q * gamma;

    for i in 0..k {
        let beta = rho[i] * y_hist[i].dot(&r);
        r.scaled_add(alpha[i] - beta, &s_hist[i]);
    }

    r
}

fn norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

fn max_abs(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0f64, |acc, x| acc.max(x.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_quadratic_bowl() {
        // f(x) = (x0 - 3)^2 + 10 (x1 + 1)^2
        let optimizer = Lbfgs::new(200, 1e-8, 5);
        let result = optimizer.minimize(array![0.0, 0.0], |x| {
            let f = (x[0] - 3.0).powi(2) + 10.0 * (x[1] + 1.0).powi(2);
            let g = array![2.0 * (x[0] - 3.0), 20.0 * (x[1] + 1.0)];
            (f, g)
        });

        assert_eq!(result.status, ConvergenceStatus::Converged);
        assert!((result.solution[0] - 3.0).abs() < 1e-6);
        assert!((result.solution[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rosenbrock() {
        let optimizer = Lbfgs::new(1000, 1e-5, 10);
        let result = optimizer.minimize(array![-1.2, 1.0], |x| {
            let (a, b) = (x[0], x[1]);
            let f = (1.0 - a).powi(2) + 100.0 * (b - a * a).powi(2);
            let g = array![
                -2.0 * (1.0 - a) - 400.0 * a * (b - a * a),
                200.0 * (b - a * a)
            ];
            (f, g)
        });

        assert!(result.objective < 1e-6);
        assert!((result.solution[0] - 1.0).abs() < 1e-3);
        assert!((result.solution[1] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_already_optimal() {
        let optimizer = Lbfgs::new(10, 1e-6, 3);
        let result = optimizer.minimize(array![0.0], |x| (x[0] * x[0], array![2.0 * x[0]]));
        assert_eq!(result.iterations, 0);
        assert_eq!(result.status, ConvergenceStatus::Converged);
    }
}
