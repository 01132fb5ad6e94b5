use std::fs;

use lin_alg::f64::Vec3;

use polysup_algos::Rotation;
use polysup_align::CommonResiduePolicy;
use polysup_mol::{Protein, Residue, ResidueId};
use polysup_superpose::prelude::*;
use polysup_superpose::{compose_superposition, get_alignment_and_spanning_tree};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn helix_coord(k: i32) -> Vec3 {
    let angle = (100.0f64 * k as f64).to_radians();
    Vec3::new(2.3 * angle.cos(), 2.3 * angle.sin(), 1.5 * k as f64)
}

fn protein(name: &str, residues: &[(i32, Vec3)]) -> Protein {
    let residues = residues
        .iter()
        .map(|&(number, coord)| Residue::with_ca(ResidueId::new('A', number, None), 'A', coord))
        .collect();
    Protein::new(name, residues)
}

/// A (10 residues), B (A translated by (5, 0, 0)), C (unrelated, sharing residues 8-10)
fn three_structures() -> Vec<Protein> {
    let a: Vec<(i32, Vec3)> = (1..=10).map(|k| (k, helix_coord(k))).collect();
    let b: Vec<(i32, Vec3)> = a.iter().map(|&(k, c)| (k, c + Vec3::new(5.0, 0.0, 0.0))).collect();
    let c: Vec<(i32, Vec3)> = [8, 9, 10, 20, 21, 22, 23]
        .iter()
        .enumerate()
        .map(|(i, &k)| {
            let t = i as f64;
            (k, Vec3::new(10.0 + 3.8 * t, -2.0 + (t * t) * 0.3, 4.0 - 1.2 * t))
        })
        .collect();
    vec![protein("A", &a), protein("B", &b), protein("C", &c)]
}

fn names_of(proteins: &[Protein]) -> Vec<String> {
    proteins.iter().map(|p| p.name.clone()).collect()
}

#[test]
fn test_three_structure_superposition() {
    init_logging();
    let proteins = three_structures();
    let params = SuperposeParams::default();

    let (alignment, orderer) = AlignmentAcquirer::ResidueName
        .get_alignment_and_orderer(&proteins, &params)
        .unwrap();
    let ab = orderer.get_score(0, 1).unwrap();
    let ac = orderer.get_score(0, 2).unwrap();
    assert!(ab > ac, "quality(A,B) = {} should exceed quality(A,C) = {}", ab, ac);
    assert!((ab - 10.0).abs() < 1e-4);
    assert_eq!(alignment.num_positions_with_both_entries(0, 2), 3);

    let (_, tree) = get_alignment_and_spanning_tree(&AlignmentAcquirer::ResidueName, &proteins, &params).unwrap();
    // C's overlaps with A and B score the same up to rounding
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0], (0, 1));
    assert!(tree[1] == (0, 2) || tree[1] == (1, 2), "{:?}", tree);

    let names = names_of(&proteins);
    let context = superpose(&AlignmentAcquirer::ResidueName, proteins, names, &params).unwrap();
    let superposition = context.superposition();

    assert!(superposition.translation(0).unwrap().magnitude() < 1e-9);
    assert!(superposition.rotation(0).unwrap().is_close(&Rotation::IDENTITY, 1e-12));
    let t_b = superposition.translation(1).unwrap();
    assert!((t_b - Vec3::new(-5.0, 0.0, 0.0)).magnitude() < 1e-6, "{}", superposition);
    assert!(superposition.rotation(1).unwrap().is_close(&Rotation::IDENTITY, 1e-6));

    // B lands exactly on A
    let a_coords = context.superposed_ca_coords(0).unwrap();
    let b_coords = context.superposed_ca_coords(1).unwrap();
    for (p, q) in a_coords.iter().zip(&b_coords) {
        assert!((*p - *q).magnitude() < 1e-6);
    }
    assert!(context.has_alignment());
    assert_eq!(context.alignment().unwrap().num_entries(), 3);
}

#[test]
fn test_zero_overlap_is_insufficient_overlap() {
    init_logging();
    let a: Vec<(i32, Vec3)> = (1..=5).map(|k| (k, helix_coord(k))).collect();
    let b: Vec<(i32, Vec3)> = (101..=105).map(|k| (k, helix_coord(k))).collect();
    let proteins = vec![protein("A", &a), protein("B", &b)];
    let params = SuperposeParams::default();

    let result = get_alignment_and_spanning_tree(&AlignmentAcquirer::ResidueName, &proteins, &params);
    assert!(matches!(
        result,
        Err(SuperposeError::InsufficientOverlap { min_common_residues: 3 })
    ));

    let names = names_of(&proteins);
    let err = superpose(&AlignmentAcquirer::ResidueName, proteins, names, &params).unwrap_err();
    assert_eq!(err.return_code(), ReturnCode::InsufficientResidueNameOverlaps);
}

#[test]
fn test_single_structure() {
    let a: Vec<(i32, Vec3)> = (1..=4).map(|k| (k, helix_coord(k))).collect();
    let proteins = vec![protein("A", &a)];
    let context = superpose(
        &AlignmentAcquirer::ResidueName,
        proteins,
        vec!["A".to_string()],
        &SuperposeParams::default(),
    )
    .unwrap();
    assert!(context.superposition().are_close(&Superposition::identity(1), 1e-12));
}

#[test]
fn test_tree_order_does_not_change_result() {
    let proteins = three_structures();
    let params = SuperposeParams::default();
    let (alignment, tree) = get_alignment_and_spanning_tree(&AlignmentAcquirer::ResidueName, &proteins, &params).unwrap();
    let forward = compose_superposition(&alignment, &proteins, &tree, &params).unwrap();
    let reversed: Vec<_> = tree.iter().rev().map(|&(i, j)| (j, i)).collect();
    let backward = compose_superposition(&alignment, &proteins, &reversed, &params).unwrap();
    assert!(forward.are_close(&backward, 1e-8), "{}\n{}", forward, backward);
}

#[test]
fn test_name_count_mismatch() {
    let proteins = three_structures();
    let result = superpose(
        &AlignmentAcquirer::ResidueName,
        proteins,
        vec!["A".to_string()],
        &SuperposeParams::default(),
    );
    assert!(matches!(result, Err(SuperposeError::NameCountMismatch { names: 1, structures: 3 })));
}

/// CORA body line for two proteins; `None` marks an absent residue
fn cora_line(position: usize, entries: [Option<i32>; 2], score: u32) -> String {
    let present = entries.iter().flatten().count();
    let mut line = format!("{:>4} {:>4} {:>4}", position, 0, present);
    for entry in entries {
        match entry {
            Some(number) => line.push_str(&format!(" {:>4}  A  0", number)),
            None => line.push_str(&format!(" {:>4}  0  0", 0)),
        }
    }
    line.push_str(&format!("   0 {:>4} {:>4}  {:>2}", 0, 0, score));
    line
}

#[test]
fn test_cora_file_with_score_policy() {
    init_logging();
    let a: Vec<(i32, Vec3)> = (1..=6).map(|k| (k, helix_coord(k))).collect();
    let r = Rotation::from_axis_angle(Vec3::new(0.3, 1.0, -0.2), 0.9);
    let offset = Vec3::new(-3.0, 8.0, 1.0);
    let mut b: Vec<(i32, Vec3)> = a.iter().map(|&(k, c)| (k + 9, r.apply(c) + offset)).collect();
    b.push((16, r.apply(helix_coord(30)) + offset));
    let proteins = vec![protein("pa", &a), protein("pb", &b)];

    let mut text = String::from("#FM CORA_FORMAT 1.1\n#CC test\n2\npa pb\n7\n");
    text.push_str(&cora_line(1, [Some(1), None], 0));
    text.push('\n');
    for k in 2..=6 {
        text.push_str(&cora_line(k as usize, [Some(k), Some(k + 9)], 80));
        text.push('\n');
    }
    text.push_str(&cora_line(7, [None, Some(16)], 0));
    text.push('\n');

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aln.cora");
    fs::write(&path, text).unwrap();

    let params = SuperposeParams {
        residue_policy: CommonResiduePolicy::MinScore { min_score: 50.0 },
        ..SuperposeParams::default()
    };
    let names = names_of(&proteins);
    let context = superpose(&AlignmentAcquirer::CoraFile { path }, proteins, names, &params).unwrap();
    assert!(context.alignment().unwrap().is_scored());

    let superposition = context.superposition();
    let (proteins, ..) = context.clone().into_parts();
    let a_coords: Vec<Vec3> = (1..6).map(|i| proteins[0].residue(i).unwrap().ca().unwrap()).collect();
    let b_coords: Vec<Vec3> = (1..6).map(|i| proteins[1].residue(i).unwrap().ca().unwrap()).collect();
    let rmsd = superposition
        .rmsd_between_superposed_entries(0, &a_coords, 1, &b_coords)
        .unwrap();
    assert!(rmsd < 1e-6, "rmsd {}", rmsd);
}
