use super::*;
use crate::config::MachineSettings;
use proptest::prelude::*;

fn letters(s: &str) -> Vec<u8> {
    s.bytes().map(|b| b - b'A').collect()
}

fn machine(
    rotors: &[RotorModel],
    rings: &str,
    start: &str,
    reflector: ReflectorModel,
    plugs: &str,
) -> Machine {
    let board: Plugboard = plugs.parse().unwrap();
    Machine::from_settings(&MachineSettings {
        rotors: rotors.to_vec(),
        rings: letters(rings),
        positions: letters(start),
        reflector,
        plugboard: board.pairs(),
    })
    .unwrap()
}

fn window(m: &Machine) -> String {
    indices_to_text(&m.positions())
}

use RotorModel::*;

#[test]
fn enigma_i_golden_fixture() {
    let mut m = machine(&[I, II, III], "AAA", "AAA", ReflectorModel::B, "");
    assert_eq!(m.encode("HELLOWORLD").unwrap(), "ILBDAAMTAZ");

    let mut m = machine(&[I, II, III], "AAA", "AAA", ReflectorModel::B, "");
    assert_eq!(m.encode("AAAAA").unwrap(), "BDZGO");
}

#[test]
fn ring_settings_shift_the_wiring() {
    let mut m = machine(&[I, II, III], "BBB", "AAA", ReflectorModel::B, "");
    assert_eq!(m.encode("AAAAA").unwrap(), "EWTYX");
    let mut m = machine(&[I, II, III], "BBB", "AAA", ReflectorModel::B, "");
    assert_eq!(m.encode("HELLOWORLD").unwrap(), "LOFUHHMJJX");
}

#[test]
fn reflector_a_and_c_fixtures() {
    let mut m = machine(&[I, II, III], "AAA", "AAA", ReflectorModel::A, "");
    assert_eq!(m.encode("HELLOWORLD").unwrap(), "KCUBRKIDKN");

    let mut m = machine(&[IV, II, V], "AAA", "QEV", ReflectorModel::C, "AB CD EF");
    assert_eq!(m.encode("H").unwrap(), "B");
    // IV sat on Q (not its notch), II on E (its notch), V on V (not its notch).
    assert_eq!(window(&m), "RFW");
    let mut m = machine(&[IV, II, V], "AAA", "QEV", ReflectorModel::C, "AB CD EF");
    assert_eq!(m.encode("HELLOWORLD").unwrap(), "BSHHRUJAWM");
}

#[test]
fn middle_rotor_double_steps() {
    let mut m = machine(&[I, II, III], "AAA", "ADU", ReflectorModel::B, "");
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for &i in &letters("AAAA") {
        out.push(m.encode_index(i));
        seen.push(window(&m));
    }
    assert_eq!(seen, vec!["ADV", "AEW", "BFX", "BFY"]);
    assert_eq!(indices_to_text(&out), "EQIB");
}

#[test]
fn leftmost_stepping_rotor_never_double_steps() {
    // Left rotor I on its own notch Q; nothing to its right is at a notch.
    let mut m = machine(&[I, II, III], "AAA", "QAA", ReflectorModel::B, "");
    m.advance(3);
    assert_eq!(window(&m), "QAD");
}

#[test]
fn m4_with_neutral_greek_rotor_matches_three_rotor_machine() {
    let mut m4 = machine(&[Beta, I, II, III], "AAAA", "AAAA", ReflectorModel::BThin, "");
    assert_eq!(m4.encode("HELLOWORLD").unwrap(), "ILBDAAMTAZ");
    // The greek rotor never moves.
    assert_eq!(m4.positions()[0], 0);
}

#[test]
fn m4_full_configuration_fixture() {
    let mut m = machine(
        &[Gamma, VI, VII, VIII],
        "BCDE",
        "QRMZ",
        ReflectorModel::CThin,
        "AT BL QZ",
    );
    m.step();
    assert_eq!(window(&m), "QSNA");
    m.step();
    assert_eq!(window(&m), "QSNB");

    let mut m = machine(
        &[Gamma, VI, VII, VIII],
        "BCDE",
        "QRMZ",
        ReflectorModel::CThin,
        "ATBLQZ",
    );
    assert_eq!(m.encode("HELLOWORLD").unwrap(), "QXEKNDWOWL");
    assert_eq!(window(&m).as_bytes()[0], b'Q');
}

#[test]
fn encode_rejects_non_alphabetic_input_without_stepping() {
    let mut m = Machine::enigma_i_default().unwrap();
    let err = m.encode("HELLO WORLD").unwrap_err();
    assert_eq!(
        err,
        crate::error::EnigmaError::InvalidCharacter {
            offset: 5,
            found: ' '
        }
    );
    assert_eq!(window(&m), "AAA");
    assert!(m.encode_bytes(b"abc").is_err());
    assert_eq!(m.encode("").unwrap(), "");
}

#[test]
fn machine_construction_rejects_invalid_stacks() {
    let mut s = MachineSettings::default();
    s.rotors = vec![I, II, I];
    assert!(Machine::from_settings(&s).is_err());

    let mut s = MachineSettings::default();
    s.rotors = vec![];
    s.rings = vec![];
    s.positions = vec![];
    assert!(Machine::from_settings(&s).is_err());

    let mut s = MachineSettings::default();
    s.rotors = vec![Beta, I, II, III, IV];
    s.rings = vec![0; 5];
    s.positions = vec![0; 5];
    assert!(Machine::from_settings(&s).is_err());

    let mut s = MachineSettings::default();
    s.positions = vec![0, 0];
    assert!(Machine::from_settings(&s).is_err());

    let mut s = MachineSettings::default();
    s.rings = vec![0, 0, 26];
    assert!(Machine::from_settings(&s).is_err());

    let mut s = MachineSettings::default();
    s.plugboard = vec![(0, 1), (1, 2)];
    assert!(Machine::from_settings(&s).is_err());
}

#[test]
fn setters_validate_and_settings_round_trip() {
    let mut m = Machine::enigma_i_default().unwrap();
    assert!(m.set_positions(&[0, 1]).is_err());
    assert!(m.set_positions(&[0, 1, 99]).is_err());
    assert_eq!(m.positions(), vec![0, 0, 0]);
    m.set_positions(&[3, 4, 5]).unwrap();
    m.set_rings(&[1, 1, 1]).unwrap();
    m.set_plugboard("QW".parse().unwrap());

    let copy = Machine::from_settings(&m.settings().unwrap()).unwrap();
    assert_eq!(copy, m);
}

#[test]
fn custom_reflector_has_no_settings() {
    let wiring = Permutation::from_letters(ReflectorModel::C.wiring()).unwrap();
    let m = Machine::new(
        [I, II, III]
            .iter()
            .map(|&r| Rotor::new(r, 0, 0).unwrap())
            .collect(),
        Reflector::custom(wiring).unwrap(),
        Plugboard::empty(),
    )
    .unwrap();
    assert!(matches!(
        m.settings(),
        Err(crate::error::EnigmaError::InvalidConfiguration(_))
    ));
    // Same wiring as UKW-C, so it still enciphers like the catalog machine.
    let mut catalog = machine(&[I, II, III], "AAA", "AAA", ReflectorModel::C, "");
    let mut custom = m.clone();
    assert_eq!(custom.encode("HELLO").unwrap(), catalog.encode("HELLO").unwrap());
    assert_eq!(custom.snapshot().reflector, "custom");
}

#[test]
fn snapshot_names_every_stage() {
    let m = machine(&[IV, II, V], "ABC", "QEV", ReflectorModel::C, "AB CD");
    let snap = m.snapshot();
    let names: Vec<&str> = snap.rotors.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["IV", "II", "V"]);
    assert_eq!(snap.rotors[1].ring, 'B');
    assert_eq!(snap.rotors[0].position, 'Q');
    assert_eq!(snap.rotors[1].notches, vec!['E']);
    assert_eq!(snap.reflector, "C");
    assert_eq!(snap.plugboard, vec!["AB", "CD"]);
}

#[test]
fn text_helpers_reject_lowercase() {
    assert_eq!(text_to_indices(b"AZ").unwrap(), vec![0, 25]);
    assert!(matches!(
        text_to_indices(b"Az"),
        Err(crate::error::EnigmaError::InvalidCharacter { offset: 1, found: 'z' })
    ));
    assert_eq!(letter_index(b'@'), None);
}

fn arb_settings() -> impl Strategy<Value = MachineSettings> {
    (
        prop::sample::subsequence(RotorModel::ALL[..8].to_vec(), 3).prop_shuffle(),
        prop::collection::vec(0u8..26, 3),
        prop::collection::vec(0u8..26, 3),
        prop::sample::select(vec![ReflectorModel::A, ReflectorModel::B, ReflectorModel::C]),
        prop::sample::subsequence((0u8..26).collect::<Vec<_>>(), 0..=20).prop_shuffle(),
    )
        .prop_map(|(rotors, rings, positions, reflector, plug_letters)| MachineSettings {
            rotors,
            rings,
            positions,
            reflector,
            plugboard: plug_letters.chunks_exact(2).map(|p| (p[0], p[1])).collect(),
        })
}

proptest! {
    #[test]
    fn encoding_is_self_inverse(settings in arb_settings(), text in "[A-Z]{0,200}") {
        let mut enc = Machine::from_settings(&settings).unwrap();
        let mut dec = Machine::from_settings(&settings).unwrap();
        let cipher = enc.encode(&text).unwrap();
        prop_assert_eq!(dec.encode(&cipher).unwrap(), text);
    }

    #[test]
    fn no_letter_encrypts_to_itself(settings in arb_settings(), text in "[A-Z]{1,100}") {
        let mut m = Machine::from_settings(&settings).unwrap();
        let cipher = m.encode(&text).unwrap();
        for (p, c) in text.bytes().zip(cipher.bytes()) {
            prop_assert_ne!(p, c);
        }
    }

    #[test]
    fn permutations_compose_to_bijections(shuffled in Just((0u8..26).collect::<Vec<_>>()).prop_shuffle()) {
        let mut table = [0u8; ALPHABET_SIZE];
        table.copy_from_slice(&shuffled);
        let p = Permutation::new(table).unwrap();
        let id = p.compose(&p.inverse());
        prop_assert_eq!(id, Permutation::identity());
        for i in 0..26u8 {
            prop_assert_eq!(p.backward(p.forward(i)), i);
        }
    }

    #[test]
    fn plugboards_stay_involutions(plug_letters in prop::sample::subsequence((0u8..26).collect::<Vec<_>>(), 0..=26).prop_shuffle()) {
        let pairs: Vec<(u8, u8)> = plug_letters.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        let board = Plugboard::from_pairs(&pairs).unwrap();
        prop_assert!(board.wiring().is_involution());
        prop_assert_eq!(board.pair_count(), pairs.len());
        prop_assert_eq!(board.wiring().fixed_points().count(), 26 - 2 * pairs.len());
    }
}
