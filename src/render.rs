use sdl2::gfx::primitives::DrawRenderer;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use crate::driver::AppState;
use crate::error::{Error, Result};
use crate::view::scope::Scope;
use crate::view::spec::Spec;
use crate::view::spectrogram::{Spectrogram, Surface};
use crate::view::{Bounds, Visualizer};

const PROMPT_BACKGROUND: Color = Color::RGB(15, 15, 15);
const PROMPT_FOREGROUND: Color = Color::RGB(200, 200, 200);
const TRACE_COLOR: Color = Color::RGB(0, 255, 0);
const CLIP_COLOR: Color = Color::RGB(255, 0, 0);
const PROMPT_TEXT: &str = "click to start";
// SDL_gfx built-in font
const GLYPH_SIZE: i32 = 8;

/// Streaming textures mirroring one spectrogram's surfaces.
struct Layer<'t> {
    textures: [Texture<'t>; 2],
    uploaded: [Option<u64>; 2],
    generation: u64,
}

impl<'t> Layer<'t> {
    fn new(creator: &'t TextureCreator<WindowContext>, sg: &Spectrogram) -> Result<Layer<'t>> {
        let Bounds { width, height, .. } = sg.bounds();
        let make = || -> Result<Texture<'t>> {
            let mut tex = creator
                .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
                .map_err(Error::graphics)?;
            tex.set_blend_mode(BlendMode::Blend);
            Ok(tex)
        };
        Ok(Layer {
            textures: [make()?, make()?],
            uploaded: [None, None],
            generation: sg.generation(),
        })
    }

    fn sync(&mut self, idx: usize, surface: &Surface) -> Result<()> {
        if self.uploaded[idx] == Some(surface.revision()) {
            return Ok(());
        }
        let width = surface.width() as usize;
        self.textures[idx]
            .with_lock(None, |buf, pitch| {
                let rows = surface.pixels().chunks(width).take(surface.height() as usize);
                for (row, src) in buf.chunks_mut(pitch).zip(rows) {
                    for (dst, px) in row.chunks_exact_mut(4).zip(src) {
                        dst.copy_from_slice(&px.to_ne_bytes());
                    }
                }
            })
            .map_err(Error::graphics)?;
        self.uploaded[idx] = Some(surface.revision());
        Ok(())
    }
}

pub struct Renderer<'t> {
    creator: &'t TextureCreator<WindowContext>,
    background: Color,
    layers: Vec<Option<Layer<'t>>>,
}

impl<'t> Renderer<'t> {
    pub fn new(creator: &'t TextureCreator<WindowContext>, background: [u8; 3]) -> Renderer<'t> {
        let [r, g, b] = background;
        Renderer {
            creator,
            background: Color::RGB(r, g, b),
            layers: Vec::new(),
        }
    }

    pub fn render(&mut self, canvas: &mut Canvas<Window>, app: &AppState) -> Result<()> {
        let _g = hprof::enter("Renderer::render");
        if !app.is_active() {
            draw_prompt(canvas, app.area())?;
            canvas.present();
            return Ok(());
        }

        canvas.set_draw_color(self.background);
        canvas.clear();

        let visualizers = app.visualizers();
        self.layers.resize_with(visualizers.len(), || None);
        for (vis, layer) in visualizers.iter().zip(self.layers.iter_mut()) {
            canvas.set_clip_rect(Some(Rect::from(vis.bounds())));
            match vis {
                Visualizer::Spectrogram(sg) => composite(canvas, self.creator, layer, sg)?,
                Visualizer::Waveform(sc) => draw_scope(canvas, sc)?,
                Visualizer::Spectrum(sp) => draw_spec(canvas, sp)?,
            }
        }
        canvas.set_clip_rect(None);
        canvas.present();
        Ok(())
    }
}

fn composite<'t>(
    canvas: &mut Canvas<Window>,
    creator: &'t TextureCreator<WindowContext>,
    layer: &mut Option<Layer<'t>>,
    sg: &Spectrogram,
) -> Result<()> {
    let Bounds { x, y, width, height } = sg.bounds();
    if width == 0 || height == 0 {
        return Ok(());
    }
    // surfaces were reallocated by a resize
    if layer.as_ref().map(|l| l.generation) != Some(sg.generation()) {
        *layer = Some(Layer::new(creator, sg)?);
    }
    let Some(layer) = layer.as_mut() else {
        return Ok(());
    };

    let (off_a, off_b) = sg.scroll().pixel_offsets();
    for (idx, off) in [(0, off_a), (1, off_b)] {
        layer.sync(idx, sg.buffers().get(idx))?;
        let dst = Rect::new(x + off, y, width, height);
        canvas.copy(&layer.textures[idx], None, dst).map_err(Error::graphics)?;
    }
    Ok(())
}

fn draw_scope(canvas: &mut Canvas<Window>, sc: &Scope) -> Result<()> {
    canvas.set_blend_mode(BlendMode::Add);
    for seg in sc.trace().windows(2) {
        canvas.set_draw_color(if seg[1].clipped { CLIP_COLOR } else { TRACE_COLOR });
        canvas
            .draw_line(Point::new(seg[0].x, seg[0].y), Point::new(seg[1].x, seg[1].y))
            .map_err(Error::graphics)?;
    }
    canvas.set_blend_mode(BlendMode::None);
    Ok(())
}

fn draw_spec(canvas: &mut Canvas<Window>, sp: &Spec) -> Result<()> {
    canvas.set_blend_mode(BlendMode::Add);
    for seg in sp.trace().windows(2) {
        let ((x0, y0, _), (x1, y1, color)) = (seg[0], seg[1]);
        canvas.set_draw_color(Color::from(color));
        canvas.draw_line(Point::new(x0, y0), Point::new(x1, y1)).map_err(Error::graphics)?;
    }
    canvas.set_blend_mode(BlendMode::None);
    Ok(())
}

/// Top-left corner of the prompt caption, centred under the button.
fn caption_origin(area: Bounds) -> (i16, i16) {
    let (cx, cy) = (area.x + area.width as i32 / 2, area.y + area.height as i32 / 2);
    let x = cx - PROMPT_TEXT.len() as i32 * GLYPH_SIZE / 2;
    (x as i16, (cy + 40 + GLYPH_SIZE) as i16)
}

/// Static "click to start" screen: an outlined button with a play glyph
/// and a caption.
fn draw_prompt(canvas: &mut Canvas<Window>, area: Bounds) -> Result<()> {
    canvas.set_draw_color(PROMPT_BACKGROUND);
    canvas.clear();
    canvas.set_draw_color(PROMPT_FOREGROUND);

    let (cx, cy) = (area.x + area.width as i32 / 2, area.y + area.height as i32 / 2);
    canvas.draw_rect(Rect::from_center(Point::new(cx, cy), 160, 80)).map_err(Error::graphics)?;
    let glyph = [
        Point::new(cx - 12, cy - 18),
        Point::new(cx + 18, cy),
        Point::new(cx - 12, cy + 18),
        Point::new(cx - 12, cy - 18),
    ];
    canvas.draw_lines(&glyph[..]).map_err(Error::graphics)?;

    let (tx, ty) = caption_origin(area);
    canvas.string(tx, ty, PROMPT_TEXT, PROMPT_FOREGROUND).map_err(Error::graphics)?;
    Ok(())
}
