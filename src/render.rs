//! Rasterization of the scene into an RGBA image
//!
//! Strokes are flattened into lines and stamped with round caps and joins:
//! coverage of a pixel is the distance from its center to the closest line
//! mapped onto one pixel of anti-aliasing.
use crate::{
    DEFAULT_FLATNESS, DrawingScene, ImageMut, ImageOwned, Line, Outline, Point, RGBA, Scalar,
    Size,
};

/// Render background, finished strokes and the current stroke
pub fn render(scene: &DrawingScene, size: Size) -> ImageOwned<RGBA> {
    let _span = tracing::debug_span!(
        "[render]",
        width = size.width,
        height = size.height,
        strokes = scene.strokes().len()
    )
    .entered();
    let background = scene.background();
    let mut image = ImageOwned::new_with(size, |_, _| background);
    let mut coverage = Vec::new();
    for stroke in scene.layers() {
        let style = stroke.style();
        let color = if style.eraser { background } else { style.color };
        stroke_outline(
            &mut image,
            &mut coverage,
            stroke.path().geometry(),
            style.effective_width(),
            color,
        );
    }
    image
}

/// Pixel region covered by the stroke, clipped to the image
#[derive(Debug, Clone, Copy, PartialEq)]
struct Region {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

impl Region {
    fn new(min: Point, max: Point, size: Size) -> Option<Self> {
        // `as usize` saturates, NaN maps to zero
        let x0 = min.x().floor().max(0.0) as usize;
        let y0 = min.y().floor().max(0.0) as usize;
        let x1 = (max.x().ceil().max(0.0) as usize).min(size.width);
        let y1 = (max.y().ceil().max(0.0) as usize).min(size.height);
        (x0 < x1 && y0 < y1).then_some(Self { x0, y0, x1, y1 })
    }

    fn width(&self) -> usize {
        self.x1 - self.x0
    }

    fn len(&self) -> usize {
        self.width() * (self.y1 - self.y0)
    }

    fn intersect(&self, other: Self) -> Option<Self> {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.x1.min(other.x1);
        let y1 = self.y1.min(other.y1);
        (x0 < x1 && y0 < y1).then_some(Self { x0, y0, x1, y1 })
    }
}

/// Stroke outline with the color, coverage of overlapping lines is merged
/// before blending so self-intersections are not painted twice
fn stroke_outline(
    image: &mut ImageOwned<RGBA>,
    coverage: &mut Vec<Scalar>,
    outline: &Outline,
    width: Scalar,
    color: RGBA,
) {
    let radius = width / 2.0;
    if !(radius >= 0.0) {
        tracing::trace!(width, "skipping stroke with invalid width");
        return;
    }
    let margin = radius + 1.0;
    let Some(bbox) = outline.bbox() else {
        return;
    };
    let bbox = bbox.inflate(margin);
    let Some(region) = Region::new(bbox.min(), bbox.max(), image.size()) else {
        return;
    };

    coverage.clear();
    coverage.resize(region.len(), 0.0);
    for line in outline.flatten(DEFAULT_FLATNESS) {
        let bbox = line.bbox().inflate(margin);
        let Some(area) = Region::new(bbox.min(), bbox.max(), image.size())
            .and_then(|area| area.intersect(region))
        else {
            continue;
        };
        cover_line(coverage, region, area, line, radius);
    }

    for row in region.y0..region.y1 {
        for col in region.x0..region.x1 {
            let value = coverage[(row - region.y0) * region.width() + col - region.x0];
            if value <= 0.0 {
                continue;
            }
            if let Some(pixel) = image.get_mut(row, col) {
                *pixel = pixel.blend_over(color, value);
            }
        }
    }
}

fn cover_line(coverage: &mut [Scalar], region: Region, area: Region, line: Line, radius: Scalar) {
    for row in area.y0..area.y1 {
        let offset = (row - region.y0) * region.width();
        for col in area.x0..area.x1 {
            let center = Point::new(col as Scalar + 0.5, row as Scalar + 0.5);
            let value = (radius + 0.5 - line.distance_to(center)).clamp(0.0, 1.0);
            let cell = &mut coverage[offset + col - region.x0];
            // NaN distance leaves coverage untouched
            *cell = cell.max(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Image;

    fn pixel(image: &ImageOwned<RGBA>, x: usize, y: usize) -> RGBA {
        image.get(y, x).copied().unwrap_or_default()
    }

    #[test]
    fn test_background_only() {
        let mut scene = DrawingScene::default();
        scene.set_background(RGBA::new(10, 20, 30, 255));
        let image = render(&scene, Size::new(8, 4));
        assert_eq!(image.size(), Size::new(8, 4));
        assert!(image.pixels().all(|p| *p == RGBA::new(10, 20, 30, 255)));

        let empty = render(&scene, Size::new(0, 0));
        assert!(empty.to_vec().is_empty());
    }

    #[test]
    fn test_horizontal_stroke() {
        let mut scene = DrawingScene::default();
        scene.set_width(3.0);
        scene.begin(5.0, 16.0);
        scene.extend(20.0, 16.0);
        scene.extend(27.0, 16.0);
        scene.end();
        let image = render(&scene, Size::new(32, 32));

        for x in 6..26 {
            assert_eq!(pixel(&image, x, 15), RGBA::BLACK, "x={}", x);
            assert_eq!(pixel(&image, x, 16), RGBA::BLACK, "x={}", x);
        }
        assert_eq!(pixel(&image, 16, 5), RGBA::WHITE);
        assert_eq!(pixel(&image, 16, 25), RGBA::WHITE);
        assert_eq!(pixel(&image, 0, 0), RGBA::WHITE);
        // anti-aliased edge
        let edge = pixel(&image, 16, 17);
        assert!(edge.red() > 0 && edge.red() < 255, "{:?}", edge);
    }

    #[test]
    fn test_decoded_document() -> Result<(), crate::SvgError> {
        let mut scene = DrawingScene::default();
        scene.begin(0.0, 0.0);
        scene.extend(10.0, 0.0);
        scene.end();
        let text = scene.to_svg(100, 50);

        let mut decoded = DrawingScene::default();
        decoded.load_svg(&text)?;
        let image = render(&decoded, Size::new(100, 50));
        for x in 0..10 {
            assert_eq!(pixel(&image, x, 0), RGBA::BLACK, "x={}", x);
        }
        assert_eq!(pixel(&image, 20, 0), RGBA::WHITE);
        assert_eq!(pixel(&image, 5, 10), RGBA::WHITE);
        assert_eq!(image, render(&scene, Size::new(100, 50)));
        Ok(())
    }

    #[test]
    fn test_current_stroke_and_eraser() {
        let mut scene = DrawingScene::default();
        scene.set_width(6.0);
        scene.begin(0.0, 10.0);
        scene.extend(20.0, 10.0);
        scene.end();

        // eraser is wider than the stroke it erases
        scene.set_eraser(true);
        scene.set_width(1.0);
        scene.begin(15.0, 0.0);
        scene.extend(15.0, 30.0);
        let image = render(&scene, Size::new(20, 20));
        assert_eq!(pixel(&image, 2, 10), RGBA::BLACK);
        assert_eq!(pixel(&image, 4, 10), RGBA::BLACK);
        assert_eq!(pixel(&image, 6, 10), RGBA::WHITE);
        assert_eq!(pixel(&image, 15, 10), RGBA::WHITE);
        assert_eq!(pixel(&image, 2, 16), RGBA::WHITE);
    }

    #[test]
    fn test_non_finite_stroke() {
        let mut scene = DrawingScene::default();
        scene.begin(Scalar::NAN, 1.0);
        scene.extend(Scalar::INFINITY, 1.0);
        scene.end();
        scene.set_width(Scalar::NAN);
        scene.begin(1.0, 1.0);
        scene.end();
        let image = render(&scene, Size::new(4, 4));
        assert_eq!(image.size(), Size::new(4, 4));
    }
}
