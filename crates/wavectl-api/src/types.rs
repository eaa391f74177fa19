// Wire types for the Topas4 public REST API.
//
// Field names mirror the device's JSON documents exactly (PascalCase
// on the wire); unknown fields are ignored so firmware additions don't
// break deserialization.

use serde::{Deserialize, Serialize};

/// Document returned by `GET Optical/WavelengthControl/Output`.
///
/// One endpoint carries both the current output wavelength and the
/// status of any in-flight wavelength-setting operation.
#[derive(Debug, Clone, Deserialize)]
pub struct WavelengthOutput {
    /// Current output wavelength in nanometers.
    #[serde(rename = "Wavelength")]
    pub wavelength: f64,

    /// Progress of the in-flight setting operation, in `[0, 1]`.
    #[serde(rename = "WavelengthSettingCompletionPart", default)]
    pub completion_part: f64,

    /// Whether a wavelength-setting operation is still running.
    #[serde(rename = "IsWavelengthSettingInProgress", default)]
    pub setting_in_progress: bool,

    /// Whether the device is blocked on a physical/human confirmation.
    #[serde(rename = "IsWaitingForUserAction", default)]
    pub waiting_for_user_action: bool,

    /// Prompts to present when `waiting_for_user_action` is set.
    #[serde(rename = "Messages", default)]
    pub messages: Vec<UserActionMessage>,
}

/// One operator prompt: text plus an optional illustration reference.
#[derive(Debug, Clone, Deserialize)]
pub struct UserActionMessage {
    #[serde(rename = "Text")]
    pub text: String,

    /// Name of an illustration image shipped with the device, if any.
    #[serde(rename = "Image", default)]
    pub image: Option<String>,
}

/// One entry of `GET Optical/WavelengthControl/ExpandedInteractions`:
/// a named tuning configuration valid over a wavelength sub-range.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpandedInteraction {
    #[serde(rename = "Type")]
    pub interaction_type: String,

    #[serde(rename = "OutputRange")]
    pub output_range: OutputRange,
}

/// Inclusive wavelength range in nanometers.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OutputRange {
    #[serde(rename = "From")]
    pub from: f64,

    #[serde(rename = "To")]
    pub to: f64,
}

/// Body of `PUT Optical/WavelengthControl/SetWavelength`.
#[derive(Debug, Clone, Serialize)]
pub struct SetWavelengthRequest<'a> {
    #[serde(rename = "Interaction")]
    pub interaction: &'a str,

    #[serde(rename = "Wavelength")]
    pub wavelength: f64,
}

/// Body of `PUT Optical/WavelengthControl/FinishWavelengthSettingAfterUserActions`.
///
/// `restore_shutter` asks the device to re-open the shutter if it was
/// open before the wavelength change closed it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FinishAfterUserActions {
    #[serde(rename = "RestoreShutter")]
    pub restore_shutter: bool,
}
