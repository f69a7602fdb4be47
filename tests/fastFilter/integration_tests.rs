use approx::assert_abs_diff_eq;
use fastFilter::prelude::*;
use ndarray::Array1;

/// Plate of `nx * ny` nodes with spacing `h` in the z = 0 plane.
fn plate(nx: usize, ny: usize, h: f64) -> Vec<f64> {
    let mut co = Vec::with_capacity(3 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            co.extend_from_slice(&[i as f64 * h, j as f64 * h, 0.0]);
        }
    }
    co
}

/// Checkerboard sensitivities in the third component.
fn checkerboard(nx: usize, ny: usize) -> Vec<f64> {
    let mut gradproj = Vec::with_capacity(3 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let s = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
            gradproj.extend_from_slice(&[0.25, -0.5, s]);
        }
    }
    gradproj
}

fn fixed_workers(n: &str) -> WorkerEnv {
    WorkerEnv::default().declared_cpus("8").filter_workers(n)
}

#[test]
fn test_short_circuit_copies_third_component() {
    let co = plate(4, 3, 1.0);
    let gradproj = checkerboard(4, 3);
    let nodedesi: Vec<usize> = (0..12).collect();
    let mut feasdir = vec![f64::NAN; 24];

    let filter = Filter::new()
        .weight_function(Linear)
        .adapter(Batch)
        .build()
        .unwrap();

    let report = filter
        .filter(&co, &gradproj, &nodedesi, &ObjectSet::unfiltered(), &mut feasdir)
        .unwrap();

    assert!(!report.filtered);
    assert_eq!(report.num_workers, 0);
    assert!(report.partitions.is_empty());
    for node in 0..12 {
        assert_eq!(feasdir[2 * node], gradproj[3 * node + 2]);
        assert_eq!(feasdir[2 * node + 1], feasdir[2 * node]);
    }
}

#[test]
fn test_short_circuit_is_idempotent() {
    let co = plate(5, 5, 0.5);
    let gradproj = checkerboard(5, 5);
    let nodedesi: Vec<usize> = (0..25).step_by(2).collect();

    let filter = Filter::new()
        .weight_function(Gaussian)
        .adapter(Batch)
        .build()
        .unwrap();

    let mut first = vec![0.0; 50];
    let mut second = vec![7.0; 50];
    filter
        .filter(&co, &gradproj, &nodedesi, &ObjectSet::default(), &mut first)
        .unwrap();
    filter
        .filter(&co, &gradproj, &nodedesi, &ObjectSet::default(), &mut second)
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_filtering_smooths_checkerboard() {
    let (nx, ny) = (10, 10);
    let co = plate(nx, ny, 1.0);
    let gradproj = checkerboard(nx, ny);
    let nodedesi: Vec<usize> = (0..nx * ny).collect();
    let mut feasdir = vec![0.0; 2 * nx * ny];

    let filter = Filter::new()
        .weight_function(Linear)
        .worker_env(fixed_workers("4"))
        .adapter(Batch)
        .build()
        .unwrap();

    let report = filter
        .filter(&co, &gradproj, &nodedesi, &ObjectSet::with_radius(1.5).unwrap(), &mut feasdir)
        .unwrap();

    assert!(report.filtered);
    assert_eq!(report.radius, Some(1.5));
    assert_eq!(report.ndesi, 100);
    assert_eq!(report.num_workers, 4);
    let bounds: Vec<(usize, usize)> = report.partitions.iter().map(|r| (r.first, r.last)).collect();
    assert_eq!(bounds, vec![(1, 25), (26, 50), (51, 75), (76, 100)]);

    // Interior nodes lose most of their amplitude
    for j in 1..ny - 1 {
        for i in 1..nx - 1 {
            let node = j * nx + i;
            assert!(feasdir[2 * node].abs() < 0.5, "node {node}: {}", feasdir[2 * node]);
        }
    }
    for node in 0..nx * ny {
        assert_eq!(feasdir[2 * node + 1], feasdir[2 * node]);
    }
}

#[test]
fn test_constant_field_is_unchanged() {
    let co = plate(6, 4, 0.3);
    let gradproj: Vec<f64> = (0..24).flat_map(|_| [1.0, 2.0, 3.25]).collect();
    let nodedesi: Vec<usize> = (0..24).collect();
    let mut feasdir = vec![0.0; 48];

    for wf in [Linear, Quadratic, Gaussian, Uniform] {
        let filter = Filter::new()
            .weight_function(wf)
            .worker_env(fixed_workers("3"))
            .adapter(Batch)
            .build()
            .unwrap();
        filter
            .filter(&co, &gradproj, &nodedesi, &ObjectSet::with_radius(0.7).unwrap(), &mut feasdir)
            .unwrap();
        for value in &feasdir {
            assert_abs_diff_eq!(*value, 3.25, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_only_design_nodes_are_filtered() {
    // Nodes 0..3 on a line, only 0 and 1 are design variables
    let co = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0];
    let gradproj = vec![0.0, 0.0, 2.0, 0.0, 0.0, 6.0, 0.0, 0.0, 100.0];
    let mut feasdir = vec![0.0; 6];

    let filter = Filter::new()
        .weight_function(Uniform)
        .adapter(Batch)
        .parallel(false)
        .build()
        .unwrap();
    let report = filter
        .filter(&co, &gradproj, &[0, 1], &ObjectSet::with_radius(1.0).unwrap(), &mut feasdir)
        .unwrap();

    assert_eq!(report.num_workers, 1);
    assert_abs_diff_eq!(feasdir[0], 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(feasdir[2], 4.0, epsilon = 1e-12);
    // Node 2 is not a design variable and keeps its raw value
    assert_eq!(feasdir[4], 100.0);
    assert_eq!(feasdir[5], 100.0);
}

#[test]
fn test_isolated_design_variables_keep_raw_values() {
    let co = plate(3, 3, 10.0);
    let gradproj = checkerboard(3, 3);
    let nodedesi: Vec<usize> = (0..9).collect();
    let mut feasdir = vec![0.0; 18];

    let filter = Filter::new()
        .weight_function(Linear)
        .worker_env(fixed_workers("2"))
        .adapter(Batch)
        .build()
        .unwrap();
    filter
        .filter(&co, &gradproj, &nodedesi, &ObjectSet::with_radius(1.0).unwrap(), &mut feasdir)
        .unwrap();

    for node in 0..9 {
        assert_eq!(feasdir[2 * node], gradproj[3 * node + 2]);
    }
}

#[test]
fn test_consistency() {
    // Parallel and sequential dispatch yield identical results
    let (nx, ny) = (12, 9);
    let co = plate(nx, ny, 0.4);
    let gradproj: Vec<f64> = (0..nx * ny)
        .flat_map(|n| [0.0, 0.0, (n as f64 * 0.7).sin() + (n as f64 / 10.0).exp()])
        .collect();
    let nodedesi: Vec<usize> = (0..nx * ny).rev().collect();

    let mut seq = vec![0.0; 2 * nx * ny];
    Filter::new()
        .weight_function(Quadratic)
        .adapter(Batch)
        .parallel(false)
        .build()
        .unwrap()
        .filter(&co, &gradproj, &nodedesi, &ObjectSet::with_radius(1.0).unwrap(), &mut seq)
        .unwrap();

    for workers in ["2", "5", "7"] {
        let mut par = vec![0.0; 2 * nx * ny];
        Filter::new()
            .weight_function(Quadratic)
            .worker_env(fixed_workers(workers))
            .adapter(Batch)
            .parallel(true)
            .build()
            .unwrap()
            .filter(&co, &gradproj, &nodedesi, &ObjectSet::with_radius(1.0).unwrap(), &mut par)
            .unwrap();

        for i in 0..seq.len() {
            assert_abs_diff_eq!(seq[i], par[i], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_ndarray_integration() {
    let co = Array1::from_vec(plate(3, 1, 1.0));
    let gradproj = Array1::from_vec(vec![0.0, 0.0, 3.0, 0.0, 0.0, 6.0, 0.0, 0.0, 9.0]);
    let mut feasdir = vec![0.0; 6];

    let filter = Filter::new()
        .weight_function(Uniform)
        .adapter(Batch)
        .parallel(false)
        .build()
        .unwrap();
    filter
        .filter(&co, &gradproj, &[0, 1, 2], &ObjectSet::with_radius(1.0).unwrap(), &mut feasdir)
        .unwrap();

    assert_abs_diff_eq!(feasdir[0], 4.5, epsilon = 1e-12);
    assert_abs_diff_eq!(feasdir[2], 6.0, epsilon = 1e-12);
    assert_abs_diff_eq!(feasdir[4], 7.5, epsilon = 1e-12);
}

#[test]
fn test_object_set_radius_field() {
    assert!(!ObjectSet::unfiltered().is_filtered());
    assert!(!ObjectSet::new("SHAPEOPT").is_filtered());
    assert_eq!(ObjectSet::default().filter_radius::<f64>(), Ok(None));

    let record = format!("{}{}", " ".repeat(81), "2.5");
    let set = ObjectSet::new(record);
    assert!(set.is_filtered());
    assert_eq!(set.filter_radius::<f64>(), Ok(Some(2.5)));

    // Fortran exponent with trailing blanks
    let record = format!("{}{:<20}{}", " ".repeat(81), "1.5D-1", "NEXT");
    assert_eq!(ObjectSet::new(record).filter_radius::<f64>(), Ok(Some(0.15)));

    // Only the leading characters decide whether a radius is present
    let record = format!("{}{:>20}", " ".repeat(81), "3.0");
    assert!(!ObjectSet::new(record).is_filtered());

    assert_eq!(ObjectSet::with_radius(0.75).unwrap().filter_radius::<f32>(), Ok(Some(0.75)));

    // Written radii read back exactly across magnitudes
    for radius in [0.75, 3.0, 1e25, 1e-30, 1.234567890123457e-5, 123456.789, 1.5e300] {
        let set = ObjectSet::with_radius(radius).unwrap();
        assert_eq!(set.radius_field().len(), 20);
        assert_eq!(set.filter_radius::<f64>(), Ok(Some(radius)), "radius={radius}");
    }

    // Too many significant digits for the field
    assert!(matches!(
        ObjectSet::with_radius(1.2345678901234567e-5),
        Err(FilterError::InvalidRadius(_))
    ));
}

#[test]
fn test_radius_outside_target_precision() {
    // Finite as f64, but overflows f32
    let record = format!("{}{}", " ".repeat(81), "1e39");
    let set = ObjectSet::new(record);
    assert_eq!(set.filter_radius::<f64>(), Ok(Some(1e39)));
    assert!(matches!(
        set.filter_radius::<f32>(),
        Err(FilterError::InvalidRadius(_))
    ));

    // Underflows f32 to zero
    let record = format!("{}{}", " ".repeat(81), "1e-50");
    assert!(matches!(
        ObjectSet::new(record).filter_radius::<f32>(),
        Err(FilterError::InvalidRadius(_))
    ));
}

#[test]
fn test_error_handling() {
    let filter = Filter::new()
        .weight_function(Linear)
        .adapter(Batch)
        .build()
        .unwrap();

    let co = plate(2, 1, 1.0);
    let gradproj = vec![0.0; 6];

    // feasdir too short
    let mut short = vec![0.0; 3];
    let err = filter
        .filter(&co, &gradproj, &[0, 1], &ObjectSet::with_radius(1.0).unwrap(), &mut short)
        .unwrap_err();
    assert_eq!(
        err,
        FilterError::MismatchedInputs {
            field: "feasdir",
            expected: 4,
            got: 3
        }
    );

    // Design node outside the mesh
    let mut feasdir = vec![0.0; 4];
    let err = filter
        .filter(&co, &gradproj, &[0, 5], &ObjectSet::with_radius(1.0).unwrap(), &mut feasdir)
        .unwrap_err();
    assert!(matches!(err, FilterError::InvalidDesignNode { node: 5, .. }));

    // Unusable radius
    let record = format!("{}{}", " ".repeat(81), "wide");
    let err = filter
        .filter(&co, &gradproj, &[0, 1], &ObjectSet::new(record), &mut feasdir)
        .unwrap_err();
    assert_eq!(err, FilterError::InvalidRadius("wide".to_string()));

    let err = filter
        .filter(&co, &gradproj, &[0, 1], &ObjectSet::with_radius(-1.0).unwrap(), &mut feasdir)
        .unwrap_err();
    assert!(matches!(err, FilterError::InvalidRadius(_)));
}

#[test]
fn test_missing_weight_function() {
    let err = Filter::new().adapter(Batch).build().unwrap_err();
    assert_eq!(err, FilterError::MissingWeightFunction);
}

#[test]
fn test_no_design_variables() {
    let co = plate(2, 2, 1.0);
    let gradproj = checkerboard(2, 2);
    let mut feasdir = vec![0.0; 8];

    let filter = Filter::new()
        .weight_function(Linear)
        .adapter(Batch)
        .build()
        .unwrap();
    let report = filter
        .filter(&co, &gradproj, &[], &ObjectSet::with_radius(1.0).unwrap(), &mut feasdir)
        .unwrap();

    assert!(!report.filtered);
    assert_eq!(feasdir, vec![1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0]);
}
