use eframe::egui::Color32;

/// Status palette shared by the entry list and the result area.
pub const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
pub const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);
pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
pub const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
