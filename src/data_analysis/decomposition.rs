// src/data_analysis/decomposition.rs

//! Splits a fitted composite curve into its shared ("main") part and background.
//!
//! Basis functions are accumulated from the front of the list until their combined
//! parameter count reaches the shared-parameter count. Those functions form the main
//! component; everything the fit adds on top of them is background.

use ndarray::Array1;

use crate::data_analysis::fit_model::{BasisFunction, Model};
use crate::error::{RenderError, RenderResult};

/// Number of leading basis functions forming the main component.
///
/// Starts from one function, so a shared count of zero still yields the first term.
pub fn main_term_count(funcs: &[BasisFunction], sharenum: usize) -> RenderResult<usize> {
    let mut n = 1;
    let mut params: usize = funcs.iter().take(1).map(|f| f.param_count()).sum();
    while params < sharenum {
        n += 1;
        match funcs.get(n - 1) {
            Some(func) => params += func.param_count(),
            None => {
                return Err(RenderError::SharedCountUnreachable {
                    sharenum,
                    available: params,
                })
            }
        }
    }
    if n > funcs.len() {
        return Err(RenderError::SharedCountUnreachable {
            sharenum,
            available: params,
        });
    }
    Ok(n)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub total: Array1<f64>,
    pub main: Array1<f64>,
    pub background: Array1<f64>,
    /// Basis functions making up the main component.
    pub main_terms: usize,
}

/// Evaluates the full model and its main component on `x`.
pub fn decompose(
    funcs: &[BasisFunction],
    sharenum: usize,
    popt: &[f64],
    x: &Array1<f64>,
) -> RenderResult<Decomposition> {
    let total = Model::unit(funcs).eval(x, popt)?;
    let n = main_term_count(funcs, sharenum)?;
    let main_model = Model::unit(&funcs[..n]);
    let main_params = main_model.param_size();
    let main = main_model.eval(x, &popt[..main_params])?;
    let background = &total - &main;
    Ok(Decomposition {
        total,
        main,
        background,
        main_terms: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use BasisFunction::*;

    #[test]
    fn test_main_term_count_accumulates() {
        assert_eq!(main_term_count(&[LorentzX, Linear], 3).unwrap(), 1);
        assert_eq!(main_term_count(&[Constant, Linear, Quadratic], 3).unwrap(), 2);
        assert_eq!(main_term_count(&[Constant, Linear, Quadratic], 4).unwrap(), 3);
        assert_eq!(main_term_count(&[Linear, Constant], 0).unwrap(), 1);
    }

    #[test]
    fn test_main_term_count_overshoot_is_allowed() {
        // The main component may carry more parameters than are shared.
        assert_eq!(main_term_count(&[Constant, Quadratic], 2).unwrap(), 2);
    }

    #[test]
    fn test_unreachable_shared_count() {
        assert!(matches!(
            main_term_count(&[Constant, Linear], 4),
            Err(RenderError::SharedCountUnreachable {
                sharenum: 4,
                available: 3
            })
        ));
        assert!(main_term_count(&[], 0).is_err());
    }

    #[test]
    fn test_background_is_total_minus_main() {
        let funcs = [Linear, Constant];
        let x = array![0.0, 1.0, 2.0];
        let d = decompose(&funcs, 2, &[1.0, 2.0, 10.0], &x).unwrap();
        assert_eq!(d.main_terms, 1);
        assert_eq!(d.main, array![1.0, 3.0, 5.0]);
        assert_eq!(d.total, array![11.0, 13.0, 15.0]);
        assert_eq!(d.background, array![10.0, 10.0, 10.0]);
    }
}
