//! Scatter demo: clustered samples on two number axes.

use std::rc::Rc;

use egui::Align2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rnav::{
    DomainEllipse, DomainLine, DomainPoint, DomainText, Hue, NavigationConfig, NavigationView,
    NumberRuler, Style, ThemeService, Variant,
};

pub type ScatterView = NavigationView<NumberRuler, NumberRuler>;

const X_MAX: f64 = 10_000.0;
const Y_MAX: f64 = 1_000.0;
const MARKER: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub label: String,
    pub center: Sample,
    pub samples: Vec<Sample>,
}

/// Generates `count` clusters of roughly normal samples.
pub fn generate_clusters(count: usize, per_cluster: usize, seed: u64) -> Vec<Cluster> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let center = Sample {
                x: rng.gen_range(0.1 * X_MAX..0.9 * X_MAX),
                y: rng.gen_range(0.1 * Y_MAX..0.9 * Y_MAX),
            };
            let spread = rng.gen_range(0.02..0.08);
            let samples = (0..per_cluster)
                .map(|_| {
                    // Sum of uniforms approximates a normal distribution
                    let nx: f64 = (0..4).map(|_| rng.gen_range(-1.0..1.0_f64)).sum::<f64>() * 0.5;
                    let ny: f64 = (0..4).map(|_| rng.gen_range(-1.0..1.0_f64)).sum::<f64>() * 0.5;
                    Sample {
                        x: (center.x + nx * spread * X_MAX).clamp(0.0, X_MAX),
                        y: (center.y + ny * spread * Y_MAX).clamp(0.0, Y_MAX),
                    }
                })
                .collect();
            Cluster {
                label: format!("Cluster {}", i + 1),
                center,
                samples,
            }
        })
        .collect()
}

/// Least-squares fit `y = a + b x` over every sample.
pub fn linear_fit(clusters: &[Cluster]) -> Option<(f64, f64)> {
    let samples = clusters.iter().flat_map(|c| c.samples.iter());
    let (mut n, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for s in samples {
        n += 1.0;
        sx += s.x;
        sy += s.y;
        sxx += s.x * s.x;
        sxy += s.x * s.y;
    }
    let denominator = n * sxx - sx * sx;
    if n < 2.0 || denominator.abs() < f64::EPSILON {
        return None;
    }
    let b = (n * sxy - sx * sy) / denominator;
    Some(((sy - b * sx) / n, b))
}

/// Scatter view plus the clusters its layers draw.
#[derive(Debug)]
pub struct ScatterDemo {
    pub view: ScatterView,
    clusters: Rc<Vec<Cluster>>,
}

impl ScatterDemo {
    /// Builds the scatter view; the vertical axis grows upwards.
    pub fn build(config: &NavigationConfig) -> anyhow::Result<Self> {
        let x = NumberRuler::new(0.0, X_MAX)?;
        let y = NumberRuler::new(0.0, Y_MAX)?.with_reverse(true);
        let mut view = NavigationView::with_config(x, y, config.clone());
        view.top_ruler_mut().set_labels(|v: &f64| format!("{v:.0} ms"));

        let clusters = Rc::new(generate_clusters(6, 400, 11));
        register_layers(&mut view, Rc::clone(&clusters));
        Ok(Self { view, clusters })
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.view.theme_mut().set_dark_mode(dark_mode);
        register_layers(&mut self.view, Rc::clone(&self.clusters));
    }
}

pub fn register_layers(view: &mut ScatterView, clusters: Rc<Vec<Cluster>>) {
    let theme = *view.theme();

    let style = Style::filled(theme.saturated_color(Hue::Teal, Variant::Fill)).with_stroke(
        theme.saturated_color(Hue::Teal, Variant::Line),
        1.5,
    );
    let points = Rc::clone(&clusters);
    view.draw_points("samples", style, move |window| {
        points
            .iter()
            .flat_map(|c| c.samples.iter())
            .filter(|s| window.contains(&s.x, &s.y))
            .map(|s| DomainPoint { x: s.x, y: s.y })
            .collect()
    });

    if let Some((a, b)) = linear_fit(&clusters) {
        let style = Style::stroked(theme.saturated_color(Hue::Orange, Variant::Line), 2.0);
        view.draw_lines("trend", style, move |window| {
            let (x0, x1) = (window.x.start, window.x.end);
            vec![DomainLine {
                x0,
                y0: a + b * x0,
                x1,
                y1: a + b * x1,
            }]
        });
    }

    let style = Style::stroked(theme.saturated_color(Hue::Purple, Variant::Border), 2.0);
    let centers = Rc::clone(&clusters);
    view.draw_ellipses("centers", style, move |window| {
        centers
            .iter()
            .filter(|c| window.contains(&c.center.x, &c.center.y))
            .map(|c| DomainEllipse {
                x: c.center.x,
                y: c.center.y,
                width: MARKER,
                height: MARKER,
            })
            .collect()
    });

    let style = Style::stroked(theme.saturated_color(Hue::Purple, Variant::TextBase), 0.0);
    view.draw_texts("labels", style, move |window| {
        clusters
            .iter()
            .filter(|c| window.contains(&c.center.x, &c.center.y))
            .map(|c| DomainText {
                x: c.center.x,
                y: c.center.y,
                text: c.label.clone(),
                anchor: Align2::LEFT_BOTTOM,
            })
            .collect()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clusters_stay_in_domain() {
        let clusters = generate_clusters(4, 50, 3);
        assert_eq!(clusters.len(), 4);
        for sample in clusters.iter().flat_map(|c| c.samples.iter()) {
            assert!((0.0..=X_MAX).contains(&sample.x));
            assert!((0.0..=Y_MAX).contains(&sample.y));
        }
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let samples = (0..10)
            .map(|i| Sample {
                x: i as f64,
                y: 3.0 + 2.0 * i as f64,
            })
            .collect();
        let clusters = vec![Cluster {
            label: "line".to_string(),
            center: Sample { x: 0.0, y: 0.0 },
            samples,
        }];
        let (a, b) = linear_fit(&clusters).unwrap();
        assert!((a - 3.0).abs() < 1e-9);
        assert!((b - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_fit_degenerate() {
        assert_eq!(linear_fit(&[]), None);
    }

    #[test]
    fn test_build_layers_in_order() {
        let demo = ScatterDemo::build(&NavigationConfig::default()).unwrap();
        let names: Vec<&str> = demo.view.layers().names().collect();
        assert_eq!(names, vec!["samples", "trend", "centers", "labels"]);
    }
}
