use crate::model::residue::ResidueInfo;

/// Switches describing which residue classes are withheld from the output.
///
/// Every flag is independent and exclusions combine with OR: an atom is
/// dropped as soon as any active exclusion matches its residue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub exclude_ions: bool,
    pub exclude_ligands: bool,
    pub exclude_hetatm: bool,
    pub exclude_water: bool,
    pub exclude_nucleic_acids: bool,
    pub exclude_amino_acids: bool,
}

/// Decides whether an atom is withheld, given its residue's classification.
///
/// An atom without residue info is never excluded; the classifier populates
/// one entry per key, so that case only arises for callers filtering atoms
/// that never went through classification.
pub fn is_excluded(info: Option<&ResidueInfo>, config: &FilterConfig) -> bool {
    let Some(info) = info else {
        return false;
    };

    (config.exclude_water && info.is_water)
        || (config.exclude_ions && info.is_ion)
        || (config.exclude_ligands && info.is_ligand)
        || (config.exclude_hetatm && info.hetatm_only)
        || (config.exclude_nucleic_acids && info.is_nucleic_acid)
        || (config.exclude_amino_acids && info.is_amino_acid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_with(f: impl FnOnce(&mut ResidueInfo)) -> ResidueInfo {
        let mut info = ResidueInfo::new("RES");
        info.hetatm_only = false;
        f(&mut info);
        info
    }

    #[test]
    fn no_active_flags_excludes_nothing() {
        let water = info_with(|i| i.is_water = true);
        assert!(!is_excluded(Some(&water), &FilterConfig::default()));
    }

    #[test]
    fn missing_residue_info_is_never_excluded() {
        let config = FilterConfig {
            exclude_water: true,
            exclude_ions: true,
            exclude_ligands: true,
            exclude_hetatm: true,
            exclude_nucleic_acids: true,
            exclude_amino_acids: true,
        };
        assert!(!is_excluded(None, &config));
    }

    #[test]
    fn each_flag_matches_its_class() {
        let cases: [(fn(&mut ResidueInfo), FilterConfig); 6] = [
            (
                |i| i.is_water = true,
                FilterConfig {
                    exclude_water: true,
                    ..Default::default()
                },
            ),
            (
                |i| i.is_ion = true,
                FilterConfig {
                    exclude_ions: true,
                    ..Default::default()
                },
            ),
            (
                |i| i.is_ligand = true,
                FilterConfig {
                    exclude_ligands: true,
                    ..Default::default()
                },
            ),
            (
                |i| i.hetatm_only = true,
                FilterConfig {
                    exclude_hetatm: true,
                    ..Default::default()
                },
            ),
            (
                |i| i.is_nucleic_acid = true,
                FilterConfig {
                    exclude_nucleic_acids: true,
                    ..Default::default()
                },
            ),
            (
                |i| i.is_amino_acid = true,
                FilterConfig {
                    exclude_amino_acids: true,
                    ..Default::default()
                },
            ),
        ];

        for (set_flag, config) in cases {
            let info = info_with(set_flag);
            assert!(is_excluded(Some(&info), &config));
            assert!(
                !is_excluded(Some(&info), &FilterConfig::default()),
                "inactive config must not exclude"
            );
        }
    }

    #[test]
    fn flags_do_not_cross_match_other_classes() {
        let water = info_with(|i| i.is_water = true);
        let config = FilterConfig {
            exclude_ions: true,
            exclude_amino_acids: true,
            ..Default::default()
        };
        assert!(!is_excluded(Some(&water), &config));
    }

    #[test]
    fn exclusions_combine_with_or() {
        let info = info_with(|i| {
            i.is_water = true;
            i.hetatm_only = true;
        });
        let config = FilterConfig {
            exclude_hetatm: true,
            ..Default::default()
        };
        assert!(is_excluded(Some(&info), &config));
    }
}
