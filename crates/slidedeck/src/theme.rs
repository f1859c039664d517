use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    pub muted: Color32,
    pub bar_background: Color32,
    pub notes_background: Color32,
    pub notes_heading: Color32,
    pub notes_foreground: Color32,
    pub h1_size: f32,
    pub h2_size: f32,
    pub h3_size: f32,
    pub body_size: f32,
    pub notes_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x0F, 0x17, 0x2A),
            foreground: Color32::from_rgb(0xE2, 0xE8, 0xF0),
            heading_color: Color32::from_rgb(0x60, 0xA5, 0xFA),
            accent: Color32::from_rgb(0x3B, 0x82, 0xF6),
            muted: Color32::from_rgb(0x47, 0x55, 0x69),
            bar_background: Color32::from_rgb(0x1E, 0x29, 0x3B),
            notes_background: Color32::from_rgb(0x02, 0x06, 0x17),
            notes_heading: Color32::from_rgb(0xFA, 0xCC, 0x15),
            notes_foreground: Color32::from_rgb(0xE2, 0xE8, 0xF0),
            h1_size: 56.0,
            h2_size: 40.0,
            h3_size: 30.0,
            body_size: 24.0,
            notes_size: 16.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            heading_color: Color32::from_rgb(0x16, 0x21, 0x3E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            muted: Color32::from_rgb(0xCB, 0xD5, 0xE1),
            bar_background: Color32::from_rgb(0xF1, 0xF5, 0xF9),
            notes_background: Color32::from_rgb(0xF8, 0xFA, 0xFC),
            notes_heading: Color32::from_rgb(0xB4, 0x53, 0x09),
            notes_foreground: Color32::from_rgb(0x33, 0x33, 0x33),
            h1_size: 56.0,
            h2_size: 40.0,
            h3_size: 30.0,
            body_size: 24.0,
            notes_size: 16.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), (opacity * 255.0) as u8)
    }

    pub fn heading_size(&self, level: u8) -> f32 {
        match level {
            1 => self.h1_size,
            2 => self.h2_size,
            3 => self.h3_size,
            _ => self.body_size,
        }
    }
}
