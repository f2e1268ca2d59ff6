//! Regression values for the worked lifting example.

use rand::{rngs::StdRng, SeedableRng};

use crate::algebra::{determinant, IBig, Poly};
use crate::divisor::ToricDivisor;
use crate::polytope::{ivec, IVec};
use crate::special::{self, LiftingExample};

fn p(s: &str) -> Poly {
    s.parse().unwrap()
}

fn example() -> LiftingExample {
    special::lifting_example().unwrap()
}

fn coeffs(ds: &[ToricDivisor]) -> Vec<IVec> {
    ds.iter().map(|d| d.prime_divisor_coeffs().clone()).collect()
}

#[test]
fn divisor_coefficients() {
    let ex = example();
    assert_eq!(
        coeffs(&ex.divisors),
        vec![
            ivec(&[0, 0, 0, 0, 2, 0, 2]),
            ivec(&[0, 0, 1, 1, 3, 0, 2]),
            ivec(&[0, 1, 0, 1, 1, 0, 1]),
            ivec(&[0, 1, 0, 1, 3, 0, 1]),
        ]
    );
    assert_eq!(
        coeffs(&ex.restricted_divisors),
        vec![ivec(&[0, 0, 0, 0]), ivec(&[0, 0, 1, 1]), ivec(&[0, 1, 0, 1]), ivec(&[0, 1, 0, 1])]
    );
}

#[test]
fn class_of_the_sum() {
    let ex = example();
    let d = &ex.divisors;
    let sum = d[1].add(&d[2]).unwrap().add(&d[3]).unwrap();
    assert_eq!(sum.equiv_class().unwrap(), ivec(&[2, 4, 8, 4]));
}

#[test]
fn section_degrees_and_sizes() {
    let ex = example();
    let sections = ex.generic_sections().unwrap();
    let degrees: Vec<IVec> = sections.iter().map(|f| ex.variety.degree_of(f).unwrap()).collect();
    assert_eq!(
        degrees,
        vec![ivec(&[0, 0, 2, 2]), ivec(&[0, 2, 4, 2]), ivec(&[1, 1, 1, 1]), ivec(&[1, 1, 3, 1])]
    );
    let sizes: Vec<usize> = ex.divisors.iter().map(|d| d.section_basis().unwrap().len()).collect();
    assert_eq!(sizes, vec![3, 9, 4, 8]);
    assert_eq!(
        sections[2],
        p("X0*X3*X6*c1 + X1*X2*X6*c2 + X1*X3*X4*X6*c0 + X1*X3*X5*c3")
    );
}

#[test]
fn restricted_points_and_distances() {
    let ex = example();
    let pbar1 = ex.restricted_divisors[1].polytope().unwrap();
    let pts: Vec<IVec> = pbar1.lattice_points().collect();
    assert_eq!(pts, vec![ivec(&[-1, 0]), ivec(&[0, 0]), ivec(&[1, 0])]);
    let dists: Vec<IVec> = pts
        .iter()
        .map(|m| pbar1.facet_distances_from_point(m).unwrap())
        .collect();
    assert_eq!(dists, vec![ivec(&[0, 0, 0, 2]), ivec(&[0, 0, 1, 1]), ivec(&[0, 0, 2, 0])]);

    for d in &ex.restricted_divisors[2..] {
        let poly = d.polytope().unwrap();
        let pts: Vec<IVec> = poly.lattice_points().collect();
        assert_eq!(pts, vec![ivec(&[0, 0]), ivec(&[0, 1]), ivec(&[1, 0]), ivec(&[1, 1])]);
        let dists: Vec<IVec> = pts
            .iter()
            .map(|m| poly.facet_distances_from_point(m).unwrap())
            .collect();
        assert_eq!(
            dists,
            vec![ivec(&[0, 1, 0, 1]), ivec(&[1, 0, 0, 1]), ivec(&[0, 1, 1, 0]), ivec(&[1, 0, 1, 0])]
        );
    }
}

#[test]
fn partition_matrix_entries() {
    let ex = example();
    let sections = ex.generic_sections().unwrap();
    let m = ex.elimination_matrix(&sections).unwrap();
    let expected = [
        [
            "X3^2*X4^2*X5^2*b6 + X3^2*X4^3*X5*X6*b3 + X3^2*X4^4*X6^2*b0",
            concat!(
                "X2*X3*X4*X5^2*b7 + X2*X3*X4^2*X5*X6*b4 + X2*X3*X4^3*X6^2*b1",
                " + X2^2*X4*X5*X6*b5 + X2^2*X4^2*X6^2*b2 + X2^2*X5^2*b8",
            ),
            "0",
        ],
        [
            "X1*X3*X4*X6*c0 + X1*X3*X5*c3",
            "X1*X2*X6*c2",
            "X0*X3*X6*c1",
        ],
        [
            "X1*X3*X4^2*X5*d4 + X1*X3*X4^3*X6*d0",
            "X1*X2*X4*X5*d6 + X1*X2*X4^2*X6*d2",
            "X0*X2*X4*X6*d3 + X0*X2*X5*d7 + X0*X3*X4*X5*d5 + X0*X3*X4^2*X6*d1",
        ],
    ];
    for (i, row) in expected.iter().enumerate() {
        for (j, entry) in row.iter().enumerate() {
            assert_eq!(m[(i, j)], p(entry), "entry ({i}, {j})");
        }
    }
}

#[test]
fn determinant_eliminates_to_three_exponents() {
    let ex = example();
    let sections = ex.generic_sections().unwrap();
    let det = determinant(&ex.elimination_matrix(&sections).unwrap()).unwrap();
    assert_eq!(det.num_terms(), 78);

    let keys: Vec<Vec<u32>> =
        det.coefficients_in(ex.restricted.indeterminates()).into_keys().collect();
    assert_eq!(keys, vec![vec![1, 1, 1, 3], vec![1, 1, 2, 2], vec![1, 1, 3, 1]]);

    assert_eq!(ex.variety.degree_of(&det).unwrap(), ivec(&[2, 4, 8, 4]));

    let full = det.coefficients_in(ex.variety.indeterminates());
    assert_eq!(full[&vec![1, 1, 3, 1, 0, 4, 0]], p("-b8*c3*d7"));
    assert_eq!(
        full[&vec![1, 1, 1, 3, 6, 0, 4]],
        p("-b0*c1*d2 + b0*c2*d1 - b1*c0*d1 + b1*c1*d0")
    );
}

#[test]
fn elimination_matrix_needs_all_four_sections() {
    let ex = example();
    let sections = ex.generic_sections().unwrap();
    assert!(ex.elimination_matrix(&sections[1..]).is_err());
}

#[test]
fn seeded_sections_keep_the_multidegree() {
    let ex = example();
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..4 {
        let sections = ex.random_sections(&mut rng, 3).unwrap();
        for (f, d) in sections.iter().zip(&ex.divisors) {
            if !f.is_zero() {
                assert_eq!(ex.variety.degree_of(f).unwrap(), d.equiv_class().unwrap());
            }
        }
        let det = determinant(&ex.elimination_matrix(&sections).unwrap()).unwrap();
        if !det.is_zero() {
            assert_eq!(ex.variety.degree_of(&det).unwrap(), ivec(&[2, 4, 8, 4]));
        }
    }
}

#[test]
fn widest_seeded_coefficients_do_not_overflow() {
    // products of three draws from [-u32::MAX, u32::MAX] exceed i64
    let ex = example();
    let mut rng = StdRng::seed_from_u64(1);
    let sections = ex.random_sections(&mut rng, u32::MAX).unwrap();
    let det = determinant(&ex.elimination_matrix(&sections).unwrap()).unwrap();
    assert!(!det.is_zero());
    assert_eq!(ex.variety.degree_of(&det).unwrap(), ivec(&[2, 4, 8, 4]));
    let i64_max = IBig::from(i64::MAX);
    assert!(det.terms().any(|(_, c)| c > &i64_max || c < &-&i64_max));
}
