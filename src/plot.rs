use std::fs;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::error::{Error, Result};
use crate::simulation::ProbabilitySeries;

/// Layout and labels of the convergence chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    /// Figure size in abstract units, scaled by `dpi` to pixels.
    pub size: (f64, f64),
    pub dpi: u32,
    /// Fixed bounds of the probability axis.
    pub y_range: (f64, f64),
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartStyle {
    /// Figure size in pixels.  Both sides must come out between 1 and
    /// `u32::MAX` pixels.
    pub fn pixel_size(&self) -> Result<(u32, u32)> {
        let to_pixels = |units: f64| {
            let px = (units * self.dpi as f64).round();
            if px.is_finite() && px >= 1.0 && px <= u32::MAX as f64 {
                Ok(px as u32)
            } else {
                Err(Error::InvalidStyle(format!(
                    "figure size {:?} at {} dpi", self.size, self.dpi)))
            }
        };
        Ok((to_pixels(self.size.0)?, to_pixels(self.size.1)?))
    }

    fn validate(&self) -> Result<(u32, u32)> {
        let (lo, hi) = self.y_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(Error::InvalidStyle(format!("y range {:?}", self.y_range)));
        }
        self.pixel_size()
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            size: (5.0, 5.0),
            dpi: 100,
            y_range: (0.4, 0.6),
            title: "Møntkast".to_string(),
            x_label: "Antal af kast".to_string(),
            y_label: "Sandsynlighed".to_string(),
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for Error where
    E: ::std::error::Error + Send + Sync {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(e.to_string())
    }
}

/// Split the polyline through `points` into the pieces that lie inside the
/// band `lo <= y <= hi`.  Segments crossing the band edge are cut at the
/// crossing.
fn clip_to_band(points: &[(f64, f64)], (lo, hi): (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    let mut pieces = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for w in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (w[0], w[1]);
        let dy = y1 - y0;
        let (t0, t1) = if dy == 0.0 {
            if y0 >= lo && y0 <= hi { (0.0, 1.0) } else { (1.0, 0.0) }
        } else {
            let (ta, tb) = ((lo - y0) / dy, (hi - y0) / dy);
            (ta.min(tb).max(0.0), ta.max(tb).min(1.0))
        };
        if t0 > t1 {
            if current.len() > 1 {
                pieces.push(current);
            }
            current = Vec::new();
            continue;
        }
        let at = |t: f64| {
            if t == 0.0 { (x0, y0) }
            else if t == 1.0 { (x1, y1) }
            else { (x0 + t * (x1 - x0), y0 + t * dy) }
        };
        if t0 > 0.0 || current.is_empty() {
            if current.len() > 1 {
                pieces.push(current);
            }
            current = vec![at(t0)];
        }
        current.push(at(t1));
        if t1 < 1.0 {
            pieces.push(current);
            current = Vec::new();
        }
    }
    if current.len() > 1 {
        pieces.push(current);
    }
    pieces
}

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>,
                  series: &ProbabilitySeries,
                  style: &ChartStyle) -> Result<()> where
    DB: DrawingBackend {
    root.fill(&WHITE)?;

    // a single point still needs a non-empty axis
    let x_max = (series.len().max(2) - 1) as f64;
    let mut chart = ChartBuilder::on(root)
        .caption(&style.title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0 .. x_max, style.y_range.0 .. style.y_range.1)?;

    chart.configure_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .draw()?;

    // estimates off the axis are left out rather than drawn on its edge
    let (lo, hi) = style.y_range;
    let points: Vec<_> = series.points().collect();
    chart.draw_series(clip_to_band(&points, style.y_range)
                      .into_iter()
                      .map(|piece| PathElement::new(piece, &RED)))?;
    chart.draw_series(points.iter()
                      .filter(|&&(_, y)| y >= lo && y <= hi)
                      .map(|&p| Circle::new(p, 3, RED.filled())))?;

    root.present()?;
    Ok(())
}

/// Render `series` as an SVG document held in memory.
pub fn render_svg_string(series: &ProbabilitySeries, style: &ChartStyle) -> Result<String> {
    let size = style.validate()?;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size)
            .into_drawing_area();
        draw_chart(&root, series, style)?;
    }
    Ok(svg)
}

/// Render `series` to an SVG file at `path`, creating missing parent
/// directories.
pub fn render_svg<P: AsRef<Path>>(series: &ProbabilitySeries,
                                  style: &ChartStyle,
                                  path: P) -> Result<()> {
    let path = path.as_ref();
    let size = style.validate()?;
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_chart(&root, series, style)?;
    }
    info!(path = %path.display(), points = series.len(), "chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use crate::simulation::{simulate, SamplingPlan};

    /// Series lines are the only red polylines in the document.
    fn red_polylines(svg: &str) -> usize {
        svg.split('<')
            .filter(|tag| tag.starts_with("polyline") && tag.contains("#FF0000"))
            .count()
    }

    fn alternating_series() -> ProbabilitySeries {
        let mut heads = false;
        let mut coin = move || {
            heads = !heads;
            Outcome::from(heads)
        };
        simulate(&mut coin, &SamplingPlan::default(), |_| ())
    }

    #[test]
    fn default_style() {
        let style = ChartStyle::default();
        assert_eq!(style.pixel_size().unwrap(), (500, 500));
        assert_eq!(style.y_range, (0.4, 0.6));
    }

    #[test]
    fn svg_has_labels_and_markers() {
        let series = alternating_series();
        let svg = render_svg_string(&series, &ChartStyle::default()).unwrap();
        assert!(svg.contains("Møntkast"));
        assert!(svg.contains("Antal af kast"));
        assert!(svg.contains("Sandsynlighed"));
        assert_eq!(svg.matches("<circle").count(), series.len());
        assert_eq!(red_polylines(&svg), 1);
    }

    #[test]
    fn single_point_renders() {
        let mut heads = false;
        let mut coin = move || {
            heads = !heads;
            Outcome::from(heads)
        };
        let plan = SamplingPlan::new(1, 10).unwrap();
        let series = simulate(&mut coin, &plan, |_| ());
        assert_eq!(series.values(), &[0.5]);
        let svg = render_svg_string(&series, &ChartStyle::default()).unwrap();
        assert_eq!(svg.matches("<circle").count(), 1);
    }

    /// First batch all heads, then tails: 1, 1/2, 1/3, 1/4.
    fn falling_series() -> ProbabilitySeries {
        let mut n = 0;
        let mut coin = move || {
            n += 1;
            Outcome::from(n <= 100)
        };
        simulate(&mut coin, &SamplingPlan::new(4, 100).unwrap(), |_| ())
    }

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn clip_cuts_at_band_edges() {
        let series = falling_series();
        let points: Vec<_> = series.points().collect();
        let pieces = clip_to_band(&points, (0.4, 0.6));
        assert_eq!(pieces.len(), 1);
        let piece = &pieces[0];
        assert_eq!(piece.len(), 3);
        assert!(close(piece[0], (0.8, 0.6)), "{:?}", piece);
        assert!(close(piece[1], (1.0, 0.5)), "{:?}", piece);
        assert!(close(piece[2], (1.6, 0.4)), "{:?}", piece);
    }

    #[test]
    fn clip_keeps_inside_and_splits_excursions() {
        let points = [(0.0, 0.5), (1.0, 0.5), (2.0, 0.9), (3.0, 0.5), (4.0, 0.45)];
        let pieces = clip_to_band(&points, (0.4, 0.6));
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0][0], (0.0, 0.5));
        assert_eq!(pieces[0][1], (1.0, 0.5));
        assert!(close(pieces[0][2], (1.25, 0.6)), "{:?}", pieces[0]);
        assert!(close(pieces[1][0], (2.75, 0.6)), "{:?}", pieces[1]);
        assert_eq!(&pieces[1][1 ..], &[(3.0, 0.5), (4.0, 0.45)]);

        assert!(clip_to_band(&[(0.0, 0.9), (1.0, 0.8)], (0.4, 0.6)).is_empty());
        assert!(clip_to_band(&[(0.0, 0.5)], (0.4, 0.6)).is_empty());
    }

    #[test]
    fn out_of_range_estimates_are_not_drawn_on_the_edge() {
        let series = falling_series();
        let style = ChartStyle::default();
        let svg = render_svg_string(&series, &style).unwrap();
        // only 1/2 lies inside [0.4, 0.6]
        assert_eq!(svg.matches("<circle").count(), 1);
        assert_eq!(red_polylines(&svg), 1);
    }

    #[test]
    fn bad_sizes_are_rejected() {
        let series = alternating_series();
        for &size in &[(0.0, 5.0), (-5.0, 5.0), (5.0, ::std::f64::NAN), (1e300, 5.0)] {
            let style = ChartStyle { size, ..ChartStyle::default() };
            match render_svg_string(&series, &style) {
                Err(Error::InvalidStyle(_)) => {},
                other => panic!("size {:?}: unexpected {:?}", size, other.map(|s| s.len())),
            }
        }
        let style = ChartStyle { y_range: (0.6, 0.4), ..ChartStyle::default() };
        assert!(render_svg_string(&series, &style).is_err());
    }
}
