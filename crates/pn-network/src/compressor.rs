//! Compressor stations coupling two pipes.

use crate::error::{NetworkError, NetworkResult};

/// Compressor model, parsed from the `type`/`model` tags of the parameter file.
#[derive(Debug, Clone, PartialEq)]
pub enum CompressorKind {
    /// `"FC"`: fixed compression. Couples outlet momentum and inlet pressure.
    FixedCompression,
    /// `"FP"` + `"AV"`: fixed pressure, adiabatic vane.
    FixedPressureAdiabaticVane { isentropic_exponent: f64 },
    /// Any other combination. G keeps its default entries.
    Unmodeled { type_tag: String, model_tag: String },
}

impl CompressorKind {
    pub fn from_tags(
        type_tag: &str,
        model_tag: &str,
        isentropic_exponent: Option<f64>,
    ) -> NetworkResult<Self> {
        match (type_tag, model_tag) {
            ("FC", _) => Ok(Self::FixedCompression),
            ("FP", "AV") => match isentropic_exponent {
                Some(kappa) if kappa.is_finite() && kappa > 0.0 => {
                    Ok(Self::FixedPressureAdiabaticVane {
                        isentropic_exponent: kappa,
                    })
                }
                _ => Err(NetworkError::InvalidArg {
                    what: "adiabatic vane compressor needs a positive isentropic exponent",
                }),
            },
            _ => Ok(Self::Unmodeled {
                type_tag: type_tag.to_owned(),
                model_tag: model_tag.to_owned(),
            }),
        }
    }

    pub fn is_modeled(&self) -> bool {
        !matches!(self, Self::Unmodeled { .. })
    }
}

/// A compressor between the outlet of `upstream` and the inlet of `downstream`.
#[derive(Debug, Clone, PartialEq)]
pub struct Compressor {
    pub name: String,
    pub kind: CompressorKind,
    /// Index of the pipe feeding the compressor
    pub upstream: usize,
    /// Index of the pipe fed by the compressor
    pub downstream: usize,
}

impl Compressor {
    pub fn new(
        name: impl Into<String>,
        kind: CompressorKind,
        upstream: usize,
        downstream: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            upstream,
            downstream,
        }
    }
}

/// Check every compressor against the pipe list.
///
/// Indices must be in range, a compressor cannot loop onto its own pipe, and
/// each pipe end carries at most one compressor.
pub(crate) fn validate_compressors(
    compressors: &[Compressor],
    pipe_count: usize,
) -> NetworkResult<()> {
    let mut outlet_used = vec![false; pipe_count];
    let mut inlet_used = vec![false; pipe_count];
    for c in compressors {
        for index in [c.upstream, c.downstream] {
            if index >= pipe_count {
                return Err(NetworkError::UnknownPipe {
                    name: c.name.clone(),
                    index,
                    pipe_count,
                });
            }
        }
        if c.upstream == c.downstream {
            return Err(NetworkError::Topology {
                what: format!("compressor '{}' connects pipe {} to itself", c.name, c.upstream),
            });
        }
        if std::mem::replace(&mut outlet_used[c.upstream], true) {
            return Err(NetworkError::Topology {
                what: format!("outlet of pipe {} feeds more than one compressor", c.upstream),
            });
        }
        if std::mem::replace(&mut inlet_used[c.downstream], true) {
            return Err(NetworkError::Topology {
                what: format!("inlet of pipe {} is fed by more than one compressor", c.downstream),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_to_kinds() {
        assert_eq!(
            CompressorKind::from_tags("FC", "whatever", None).unwrap(),
            CompressorKind::FixedCompression
        );
        assert_eq!(
            CompressorKind::from_tags("FP", "AV", Some(1.4)).unwrap(),
            CompressorKind::FixedPressureAdiabaticVane {
                isentropic_exponent: 1.4
            }
        );
        let xx = CompressorKind::from_tags("XX", "YY", None).unwrap();
        assert!(!xx.is_modeled());
        assert_eq!(
            xx,
            CompressorKind::Unmodeled {
                type_tag: "XX".into(),
                model_tag: "YY".into()
            }
        );
        // FP without the AV model is not modeled either
        assert!(!CompressorKind::from_tags("FP", "XX", None).unwrap().is_modeled());
    }

    #[test]
    fn adiabatic_vane_needs_exponent() {
        assert!(CompressorKind::from_tags("FP", "AV", None).is_err());
        assert!(CompressorKind::from_tags("FP", "AV", Some(0.0)).is_err());
    }

    #[test]
    fn topology_validation() {
        let fc = |up, down| Compressor::new("c", CompressorKind::FixedCompression, up, down);
        assert!(validate_compressors(&[fc(0, 1)], 2).is_ok());
        assert!(validate_compressors(&[fc(0, 1), fc(1, 2)], 3).is_ok());
        assert!(matches!(
            validate_compressors(&[fc(0, 2)], 2),
            Err(NetworkError::UnknownPipe { index: 2, .. })
        ));
        assert!(matches!(
            validate_compressors(&[fc(1, 1)], 2),
            Err(NetworkError::Topology { .. })
        ));
        assert!(matches!(
            validate_compressors(&[fc(0, 1), fc(0, 2)], 3),
            Err(NetworkError::Topology { .. })
        ));
        assert!(matches!(
            validate_compressors(&[fc(0, 2), fc(1, 2)], 3),
            Err(NetworkError::Topology { .. })
        ));
    }
}
