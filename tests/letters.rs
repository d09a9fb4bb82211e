use handshape::distance::{contour_costs, letter_distance, measure_contour, similarity, Method};
use handshape::letters::{letter_to_arm, letter_to_pm, notations_agree};
use handshape::{HandshapeError, NotationTables};

fn tables() -> NotationTables {
    NotationTables::embedded().unwrap()
}

#[test]
fn p_and_k_differ_only_at_the_wrist() {
    let t = tables();
    assert_eq!(letter_distance(&t, 'p', 'k', Method::Unweighted).unwrap(), 70);
    assert_eq!(letter_distance(&t, 'p', 'k', Method::Weighted).unwrap(), 280);

    let p = letter_to_arm(&t, "p").unwrap().resolve(&t).unwrap();
    let k = letter_to_arm(&t, "k").unwrap().resolve(&t).unwrap();
    assert_eq!(p.hand(), k.hand());
}

#[test]
fn b_and_s_differ_in_four_fingers() {
    let t = tables();
    assert_eq!(letter_distance(&t, 'b', 's', Method::Unweighted).unwrap(), 1080);
    assert_eq!(letter_distance(&t, 'b', 's', Method::Weighted).unwrap(), 2160);
}

#[test]
fn distance_is_symmetric() {
    let t = tables();
    for (a, b) in [('a', 'z'), ('f', 'o'), ('y', 'c')] {
        for method in [Method::Unweighted, Method::Weighted] {
            assert_eq!(
                letter_distance(&t, a, b, method).unwrap(),
                letter_distance(&t, b, a, method).unwrap()
            );
        }
    }
}

#[test]
fn similarity_sums_aligned_letters() {
    let t = tables();
    assert_eq!(similarity(&t, "pk", "kp", Method::Unweighted).unwrap(), 140);
    assert_eq!(similarity(&t, "pb", "ks", Method::Weighted).unwrap(), 280 + 2160);
    assert!(matches!(
        similarity(&t, "ab", "abc", Method::Unweighted),
        Err(HandshapeError::Specification(_))
    ));
}

#[test]
fn contour_wraps_around() {
    let t = tables();
    assert_eq!(contour_costs(&t, "pk", Method::Unweighted).unwrap(), vec![70, 70]);
    assert_eq!(measure_contour(&t, "pk", Method::Unweighted).unwrap(), 140);
    assert_eq!(measure_contour(&t, "bsb", Method::Unweighted).unwrap(), 2 * 1080);
}

#[test]
fn every_letter_agrees_across_notations() {
    let t = tables();
    for letter in 'a'..='z' {
        let letter = letter.to_string();
        assert!(notations_agree(&t, &letter, 0).unwrap(), "letter {letter}");
        assert!(letter_to_pm(&t, &letter).is_ok());
    }
}

#[test]
fn tables_can_be_loaded_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    for name in handshape::json_loader::TABLE_FILES {
        let text = handshape::json_loader::TableSource::Embedded.read(name).unwrap();
        std::fs::write(dir.path().join(name), text).unwrap();
    }
    let t = NotationTables::from_dir(dir.path()).unwrap();
    assert_eq!(letter_distance(&t, 'p', 'k', Method::Unweighted).unwrap(), 70);
}
