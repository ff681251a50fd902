//! Algebraic properties of `Matrix` checked over seeded random inputs.

use mlp_trainer::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOL: f64 = 1e-9;

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
    Matrix::random(rows, cols, 5.0, rng).unwrap()
}

fn random_shape(rng: &mut StdRng) -> (usize, usize) {
    (rng.gen_range(1..6), rng.gen_range(1..6))
}

#[test]
fn product_shape_and_transpose_identity() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..50 {
        let (m, n) = random_shape(&mut rng);
        let p = rng.gen_range(1..6);
        let a = random_matrix(&mut rng, m, n);
        let b = random_matrix(&mut rng, n, p);

        let ab = a.matmul(&b).unwrap();
        assert_eq!(ab.shape(), (m, p));

        let lhs = ab.transpose();
        let rhs = b.transpose().matmul(&a.transpose()).unwrap();
        assert!(lhs.approx_eq(&rhs, TOL), "(AB)ᵀ != BᵀAᵀ for {m}x{n} · {n}x{p}");
    }
}

#[test]
fn double_transpose_is_identity() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let (m, n) = random_shape(&mut rng);
        let a = random_matrix(&mut rng, m, n);
        assert_eq!(a.transpose().transpose(), a);
    }
}

#[test]
fn identity_map_preserves_matrix() {
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..20 {
        let (m, n) = random_shape(&mut rng);
        let a = random_matrix(&mut rng, m, n);
        assert_eq!(a.map(|x| x), a);
        assert_eq!(a.transpose().map(|x| x), a.transpose());
    }
}

#[test]
fn scalar_broadcast_matches_map() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..20 {
        let (m, n) = random_shape(&mut rng);
        let a = random_matrix(&mut rng, m, n);
        let c: f64 = rng.gen_range(-3.0..3.0);
        let scalar = Matrix::filled(1, 1, c).unwrap();
        assert_eq!(a.broadcast(&scalar, |x, y| x + y).unwrap(), a.map(|x| x + c));
    }
}

#[test]
fn axis_sums_match_row_and_column_sums() {
    let mut rng = StdRng::seed_from_u64(10);
    for _ in 0..20 {
        let (m, n) = random_shape(&mut rng);
        let a = random_matrix(&mut rng, m, n);

        let col_sums = a.sum_axis(0).unwrap();
        assert_eq!(col_sums.shape(), (1, n));
        for j in 0..n {
            let expected: f64 = (0..m).map(|i| a[(i, j)]).sum();
            assert!((col_sums[(0, j)] - expected).abs() < TOL);
        }

        let row_sums = a.sum_axis(1).unwrap();
        assert_eq!(row_sums.shape(), (m, 1));
        for i in 0..m {
            let expected: f64 = (0..n).map(|j| a[(i, j)]).sum();
            assert!((row_sums[(i, 0)] - expected).abs() < TOL);
        }

        assert!((col_sums.sum() - a.sum()).abs() < TOL);
    }
}

#[test]
fn operations_never_modify_their_receiver() {
    let a = Matrix::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let snapshot = a.to_vec();
    let _ = a.transpose();
    let _ = a.map(|x| x * 10.0);
    let _ = a.add(&a).unwrap();
    let _ = a.matmul(&a).unwrap();
    let _ = a.broadcast(&Matrix::filled(1, 2, 1.0).unwrap(), |x, y| x - y).unwrap();
    assert_eq!(a.to_vec(), snapshot);
}
