use proptest::prelude::*;
use punchkit_camtools::{
    generate_pattern, generate_pattern_with_config, layer_geometry, solve_rotation_plan,
    CommandStatistics, PassCursor, PatternGenerator,
};
use punchkit_core::{GenerationConfig, MachineParameters, MotionCommand, CUT_PAUSE_CODE};

fn small_job() -> MachineParameters {
    MachineParameters {
        tube_length: 264.0,
        inner_diameter: 20.0,
        outer_diameter: 24.0,
        ..Default::default()
    }
}

fn short_stitching() -> GenerationConfig {
    GenerationConfig {
        extra_revolutions: 2,
        ..Default::default()
    }
}

#[test]
fn test_reference_rotation_plan() {
    let plan = solve_rotation_plan(&MachineParameters::default(), &GenerationConfig::default())
        .unwrap();
    assert_eq!(plan.ideal_revolutions, 5);
    assert_eq!(plan.main_revolutions, 8);
    assert_eq!(plan.calculated_outer_diameter, 76.0);
}

#[test]
fn test_generation_is_deterministic() {
    let a = generate_pattern_with_config(&small_job(), &short_stitching()).unwrap();
    let b = generate_pattern_with_config(&small_job(), &short_stitching()).unwrap();
    assert_eq!(a, b);

    let text_a: Vec<String> = a.iter().map(|c| c.to_gcode_line()).collect();
    let text_b: Vec<String> = b.iter().map(|c| c.to_gcode_line()).collect();
    assert_eq!(text_a, text_b);
}

#[test]
fn test_seed_changes_pattern() {
    let other_seed = GenerationConfig {
        random_seed: 6,
        ..short_stitching()
    };
    let a = generate_pattern_with_config(&small_job(), &short_stitching()).unwrap();
    let b = generate_pattern_with_config(&small_job(), &other_seed).unwrap();
    assert_eq!(a.len(), b.len());
    assert_ne!(a, b);
}

#[test]
fn test_single_cut_pause_between_passes() {
    let generator = PatternGenerator::new(small_job(), short_stitching()).unwrap();
    let commands = generator.generate().unwrap();

    let pauses: Vec<usize> = commands
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_coded_pause(CUT_PAUSE_CODE))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(pauses.len(), 1);

    let mut cursor = PassCursor::default();
    let build = generator
        .generate_pass(&mut cursor, generator.plan().main_revolutions, None)
        .unwrap();
    assert_eq!(pauses[0], build.len());
    assert_eq!(commands[..build.len()], build[..]);
}

#[test]
fn test_stitching_pass_continues_angle_and_freezes_depth() {
    let generator = PatternGenerator::new(small_job(), short_stitching()).unwrap();
    let commands = generator.generate().unwrap();
    let main = generator.plan().main_revolutions as f64;

    let pause = commands
        .iter()
        .position(|c| c.is_coded_pause(CUT_PAUSE_CODE))
        .unwrap();
    let first_stitch = commands[pause + 1].as_linear().unwrap();
    assert_eq!(first_stitch.target().a, Some(360.0 * main));

    // Support axis stays at the depth reached by the build pass
    let params = generator.params();
    let frozen_z = params.zero_offset_z - params.fabric_thickness * main;
    for command in &commands[pause + 1..] {
        if let Some(linear) = command.as_linear() {
            if let Some(z) = linear.target().z {
                assert!(
                    (z - frozen_z).abs() < 1e-9 || (z - frozen_z - params.support_depth).abs() < 1e-9
                );
            }
        }
    }
}

#[test]
fn test_no_build_pass_means_no_pause() {
    let params = MachineParameters {
        outer_diameter: 20.0,
        ..small_job()
    };
    let commands = generate_pattern_with_config(&params, &short_stitching()).unwrap();
    assert!(!commands.is_empty());
    assert!(!commands.iter().any(|c| c.is_coded_pause(CUT_PAUSE_CODE)));
    assert_eq!(commands[0].as_linear().unwrap().target().a, Some(0.0));
}

#[test]
fn test_single_row_punches_every_step() {
    let generator = PatternGenerator::new(small_job(), short_stitching()).unwrap();
    let mut cursor = PassCursor::default();
    let commands = generator.generate_pass(&mut cursor, 1, None).unwrap();

    let stats = CommandStatistics::collect(&commands);
    let steps = layer_geometry(generator.params(), 0).unwrap().angle_step_count as usize;
    assert_eq!(stats.rotations, steps);
    assert_eq!(
        stats.punch_sequences,
        steps * generator.layout().punches_per_step() as usize
    );
}

#[test]
fn test_punch_groups_share_x() {
    let commands = generate_pattern_with_config(&small_job(), &short_stitching()).unwrap();
    for window in commands.windows(3) {
        if let [MotionCommand::Linear(a), MotionCommand::Linear(p), MotionCommand::Linear(r)] =
            window
        {
            if a.kind() == punchkit_core::MoveKind::Approach {
                assert_eq!(a.target().x, p.target().x);
                assert_eq!(a.target().x, r.target().x);
                assert_eq!(a.target().y, r.target().y);
                assert_eq!(a.target().z, r.target().z);
            }
        }
    }
}

#[test]
fn test_x_stays_near_tube() {
    let params = small_job();
    let commands = generate_pattern_with_config(&params, &short_stitching()).unwrap();
    let limit = params.head_length * (params.zone_count() - 1) as f64
        + params.needle_step_x
        + params.jitter_bound;
    for command in &commands {
        if let Some(x) = command.as_linear().and_then(|m| m.target().x) {
            assert!(x >= -params.jitter_bound - 1e-9 && x <= limit + 1e-9, "x = {}", x);
        }
    }
}

#[test]
fn test_default_generation_succeeds() {
    let params = small_job();
    let commands = generate_pattern(&params).unwrap();
    let generator = PatternGenerator::new(params, GenerationConfig::default()).unwrap();
    assert!(commands.len() as u64 <= generator.estimated_command_count());
}

#[test]
fn test_inconsistent_substeps_rejected_before_generation() {
    let params = MachineParameters {
        substeps_per_revolution: 3,
        ..small_job()
    };
    let err = generate_pattern(&params).unwrap_err();
    assert!(!err.is_precondition_violation());
    assert!(err.to_string().contains("substeps_per_revolution"));
}

proptest! {
    #[test]
    fn prop_step_count_is_multiple_of_head_offset(
        revolution in 0u32..200,
        rows in 1u32..5,
        spacing in 1u32..12,
        step in 0.5f64..6.0,
    ) {
        let params = MachineParameters {
            needle_rows: rows,
            needle_row_spacing: spacing,
            punch_step: step,
            ..Default::default()
        };
        let layer = layer_geometry(&params, revolution).unwrap();
        let offset = params.effective_head_offset();
        prop_assert!(layer.angle_step_count > 0);
        prop_assert_eq!(layer.angle_step_count % offset, 0);
    }

    #[test]
    fn prop_plan_is_monotonic_in_outer_diameter(
        inner in 10.0f64..300.0,
        delta in 0.0f64..50.0,
        more in 0.0f64..50.0,
        thickness in 0.1f64..5.0,
    ) {
        let config = GenerationConfig::default();
        let smaller = MachineParameters {
            inner_diameter: inner,
            outer_diameter: inner + delta,
            fabric_thickness: thickness,
            ..Default::default()
        };
        let larger = MachineParameters {
            outer_diameter: inner + delta + more,
            ..smaller.clone()
        };
        let a = solve_rotation_plan(&smaller, &config).unwrap();
        let b = solve_rotation_plan(&larger, &config).unwrap();
        prop_assert!(b.main_revolutions >= a.main_revolutions);
        prop_assert_eq!(a.main_revolutions % a.density_divisor, 0);
    }
}
