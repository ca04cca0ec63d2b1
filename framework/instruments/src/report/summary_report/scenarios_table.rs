use tabled::Tabled;

#[derive(Tabled)]
pub struct ScenarioRow {
    pub scenario_id: String,
    pub pixel_tags: u32,
    pub dom_tags: u32,
    pub variables: u32,
    pub depth: u32,
    pub fan_out: u32,
    pub iterations: u32,
    #[tabled(display = "float2")]
    pub mean_load_ms: f64,
    #[tabled(display = "float2")]
    pub mean_busy_ms: f64,
    #[tabled(display = "float2")]
    pub std_deviation_ms: f64,
}

fn float2(n: &f64) -> String {
    format!("{n:.2}")
}
