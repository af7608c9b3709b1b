use super::*;

const ALL: [MaskingLevel; 3] = [MaskingLevel::None, MaskingLevel::Partial, MaskingLevel::Full];

#[test]
fn test_level_ordering() {
    assert!(MaskingLevel::Full > MaskingLevel::Partial);
    assert!(MaskingLevel::Partial > MaskingLevel::None);
    assert!(MaskingLevel::Full.rank() > MaskingLevel::None.rank());
    assert_eq!(MaskingLevel::default(), MaskingLevel::None);
}

#[test]
fn test_level_from_str() {
    assert_eq!("FULL".parse::<MaskingLevel>().unwrap(), MaskingLevel::Full);
    assert_eq!(" partial ".parse::<MaskingLevel>().unwrap(), MaskingLevel::Partial);
    let err = "secret".parse::<MaskingLevel>().unwrap_err();
    assert!(err.to_string().contains("E007"));
}

#[test]
fn test_level_serde_lowercase() {
    let level: MaskingLevel = serde_yaml::from_str("full").unwrap();
    assert_eq!(level, MaskingLevel::Full);
}

#[test]
fn test_transmitted_by_raises_and_reports_change() {
    let mut attrs = MaskingAttributes::new(MaskingLevel::None);
    assert!(attrs.transmitted_by(&MaskingLevel::Partial.into()));
    assert_eq!(attrs.level(), MaskingLevel::Partial);
    assert!(!attrs.transmitted_by(&MaskingLevel::None.into()));
    assert_eq!(attrs.level(), MaskingLevel::Partial);
}

#[test]
fn test_never_change_at_top() {
    let mut attrs = MaskingAttributes::new(MaskingLevel::Partial);
    assert!(!attrs.is_never_change());
    attrs.transmitted_by_in_expression(&MaskingLevel::Full.into());
    assert!(attrs.is_never_change());
    assert!(!attrs.transmitted_by(&MaskingLevel::None.into()));
    assert_eq!(attrs.level(), MaskingLevel::Full);
}

#[test]
fn test_join_is_commutative_associative_idempotent() {
    for a in ALL {
        for b in ALL {
            let ab = MaskingAttributes::new(a).joined(&b.into());
            let ba = MaskingAttributes::new(b).joined(&a.into());
            assert_eq!(ab, ba);

            let aa = MaskingAttributes::new(a).joined(&a.into());
            assert_eq!(aa, MaskingAttributes::new(a));

            for c in ALL {
                let left = MaskingAttributes::new(a)
                    .joined(&b.into())
                    .joined(&c.into());
                let right = MaskingAttributes::new(a).joined(&MaskingAttributes::new(b).joined(&c.into()));
                assert_eq!(left, right);
            }
        }
    }
}

#[test]
fn test_join_is_monotone() {
    for a in ALL {
        for b in ALL {
            let joined = MaskingAttributes::new(a).joined(&b.into());
            assert!(joined.level() >= a);
            assert!(joined.level() >= b);
        }
    }
}
