//! Factors over binary variables
//!
//! A factor maps every joint assignment of its variables to a non-negative
//! weight. Assignment `a` sets variable `vars[i]` to bit `i` of `a`.

use super::model::Node;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Factor {
    vars: Vec<usize>,
    values: Vec<f64>,
}

#[inline]
fn bit(assignment: usize, position: usize) -> bool {
    (assignment >> position) & 1 == 1
}

impl Factor {
    /// Factor for P(node | parents).
    pub(crate) fn from_node(index: usize, node: &Node) -> Self {
        let parents = node.parents();
        let k = parents.len();
        let mut vars = parents.to_vec();
        vars.push(index);

        let values = (0..1usize << (k + 1))
            .map(|assignment| {
                // First parent is the most significant column bit.
                let column = (0..k).fold(0usize, |col, i| {
                    (col << 1) | usize::from(bit(assignment, i))
                });
                node.cpt().probability(bit(assignment, k), column)
            })
            .collect();

        Self { vars, values }
    }

    pub(crate) fn vars(&self) -> &[usize] {
        &self.vars
    }

    pub(crate) fn contains(&self, var: usize) -> bool {
        self.vars.contains(&var)
    }

    /// Weight of `var = state`; only meaningful for single-variable factors.
    pub(crate) fn value_of(&self, state: bool) -> f64 {
        self.values[usize::from(state)]
    }

    /// Fixes `var` to `state` and drops it from the scope.
    pub(crate) fn reduce(&self, var: usize, state: bool) -> Self {
        let Some(position) = self.vars.iter().position(|&v| v == var) else {
            return self.clone();
        };
        let mut vars = self.vars.clone();
        vars.remove(position);

        let low_mask = (1usize << position) - 1;
        let values = (0..1usize << vars.len())
            .map(|assignment| {
                let low = assignment & low_mask;
                let high = (assignment & !low_mask) << 1;
                self.values[high | (usize::from(state) << position) | low]
            })
            .collect();

        Self { vars, values }
    }

    /// Pointwise product over the union of both scopes.
    pub(crate) fn product(&self, other: &Factor) -> Self {
        let mut vars = self.vars.clone();
        for &v in &other.vars {
            if !vars.contains(&v) {
                vars.push(v);
            }
        }

        let positions = |factor: &Factor| -> Vec<usize> {
            factor
                .vars
                .iter()
                .map(|v| vars.iter().position(|u| u == v).unwrap_or_default())
                .collect()
        };
        let left = positions(self);
        let right = positions(other);

        let project = |assignment: usize, positions: &[usize]| -> usize {
            positions
                .iter()
                .enumerate()
                .fold(0, |acc, (i, &p)| acc | (usize::from(bit(assignment, p)) << i))
        };

        let values = (0..1usize << vars.len())
            .map(|assignment| {
                self.values[project(assignment, &left)] * other.values[project(assignment, &right)]
            })
            .collect();

        Self { vars, values }
    }

    /// Marginalizes `var` out of the factor.
    pub(crate) fn sum_out(&self, var: usize) -> Self {
        if !self.contains(var) {
            return self.clone();
        }
        let no = self.reduce(var, false);
        let yes = self.reduce(var, true);
        let values = no
            .values
            .iter()
            .zip(&yes.values)
            .map(|(a, b)| a + b)
            .collect();
        Self {
            vars: no.vars,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(vars: Vec<usize>, values: Vec<f64>) -> Factor {
        Factor { vars, values }
    }

    #[test]
    fn test_reduce_middle_variable() {
        // vars [0, 1, 2]; value = assignment index for easy tracking
        let f = factor(vec![0, 1, 2], (0..8).map(|i| i as f64).collect());
        let r = f.reduce(1, true);
        assert_eq!(r.vars(), &[0, 2]);
        // (v0, v2) = (0,0)->2, (1,0)->3, (0,1)->6, (1,1)->7
        assert_eq!(r.values, vec![2.0, 3.0, 6.0, 7.0]);
    }

    #[test]
    fn test_reduce_absent_variable_is_identity() {
        let f = factor(vec![4], vec![0.3, 0.7]);
        assert_eq!(f.reduce(9, true), f);
    }

    #[test]
    fn test_sum_out() {
        let f = factor(vec![0, 1], vec![0.1, 0.2, 0.3, 0.4]);
        let s = f.sum_out(0);
        assert_eq!(s.vars(), &[1]);
        assert!((s.value_of(false) - 0.3).abs() < 1e-12);
        assert!((s.value_of(true) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_product_aligns_shared_variables() {
        let a = factor(vec![0], vec![0.4, 0.6]);
        let b = factor(vec![1, 0], vec![0.9, 0.2, 0.1, 0.8]);
        let p = a.product(&b);
        assert_eq!(p.vars(), &[0, 1]);
        // (v0, v1): (0,0)=0.4*0.9 (1,0)=0.6*0.1 (0,1)=0.4*0.2 (1,1)=0.6*0.8
        let expected = [0.36, 0.06, 0.08, 0.48];
        for (got, want) in p.values.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }
}
