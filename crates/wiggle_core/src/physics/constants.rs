//! Physical constants in natural units (GeV, ħ = c = 1).

/// ħc in GeV·fm; divide a length in fm by this to obtain GeV⁻¹.
pub const HBAR_C_GEV_FM: f64 = 0.197_326_980_4;

/// Proton mass in GeV.
pub const PROTON_MASS: f64 = 0.938_272_088_16;

/// Squared proton mass in GeV².
pub const PROTON_MASS_SQ: f64 = PROTON_MASS * PROTON_MASS;

/// Electron mass in GeV.
pub const ELECTRON_MASS: f64 = 0.000_51;

/// Muon mass in GeV.
pub const MUON_MASS: f64 = 0.105_66;

/// Tau mass in GeV.
pub const TAU_MASS: f64 = 1.776_86;

/// Fine-structure constant.
pub const ALPHA_EM: f64 = 1.0 / 137.036;

/// Conversion factor from GeV⁻² to nanobarn.
pub const GEV2_TO_NANOBARN: f64 = 3.8938e-4 * 1.0e9;

/// Converts a length in fm to GeV⁻¹.
#[inline]
pub fn fm_to_inverse_gev(length_fm: f64) -> f64 {
    length_fm / HBAR_C_GEV_FM
}
