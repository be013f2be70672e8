use fluidfield::FluidField;

#[test]
fn test_density_decays_at_damp_rate_without_flow() {
    let mut field = FluidField::new(20, 20).unwrap();
    let damp = field.config().damp;

    field.update(
        |f| {
            f.set_density(5, 5, 80.0);
            f.set_density(12, 7, 40.0);
            f.set_density(0, 19, 20.0);
        },
        |_| {},
    );
    let initial = field.snapshot().unwrap();

    let mut previous = initial.clone();
    for step in 1..=15 {
        field.update(|_| {}, |_| {});
        let current = field.snapshot().unwrap();

        for (i, (&now, &before)) in current.density.iter().zip(&previous.density).enumerate() {
            assert!(now <= before, "cell {i} grew at step {step}: {before} -> {now}");
            let expected = initial.density[i] * damp.powi(step);
            assert!(
                (now - expected).abs() <= 1e-4 * expected.max(1.0),
                "cell {i} at step {step}: expected {expected}, got {now}"
            );
        }
        assert!(current.velocity_x.iter().all(|v| *v == 0.0));
        assert!(current.velocity_y.iter().all(|v| *v == 0.0));
        previous = current;
    }
}

#[test]
fn test_total_density_never_increases_without_input() {
    let mut field = FluidField::new(30, 30).unwrap();

    field.update(
        |f| {
            for i in 0..30 {
                f.set_density(i, i, 60.0);
                f.set_density(29 - i, i, 30.0);
            }
        },
        |_| {},
    );

    let mut total = field.snapshot().unwrap().total_density();
    for step in 0..20 {
        field.update(|_| {}, |_| {});
        let next = field.snapshot().unwrap().total_density();
        assert!(next <= total, "step {step}: total grew {total} -> {next}");
        total = next;
    }
    assert!(total > 0.0);
}
