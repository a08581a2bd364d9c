use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swgl::{Framebuffer, Image, IVec2, Pipeline, PipelineState, PixelFormat, Vec4, Viewport};

#[derive(Copy, Clone)]
struct Vert {
    position: [f32; 4],
    color: Vec4,
}

fn triangle_verts() -> [Vert; 3] {
    [
        Vert { position: [-0.9, -0.9, 0.2, 1.0], color: Vec4::new(1.0, 0.0, 0.0, 1.0) },
        Vert { position: [0.9, -0.9, 0.2, 1.0], color: Vec4::new(0.0, 1.0, 0.0, 1.0) },
        Vert { position: [0.0, 0.9, 0.2, 1.0], color: Vec4::new(0.0, 0.0, 1.0, 1.0) },
    ]
}

fn vertex_shader(index: u32, _bytes: &[u8], _sd: &mut ()) -> swgl::Vertex<Vec4> {
    let v = triangle_verts()[index as usize % 3];
    swgl::Vertex::new(Vec4::new(v.position[0], v.position[1], v.position[2], v.position[3]), v.color)
}

fn fragment_shader(color: &Vec4, _pos: IVec2, _depth: f32, out: &mut swgl::FragmentOutput<1>, _sd: &mut ()) {
    out.attachments[0] = *color;
}

fn bench_fill_triangle(c: &mut Criterion) {
    let pipeline = Pipeline::new(16, vertex_shader, fragment_shader);
    let mut color = Image::new(512, 512, PixelFormat::Rgba32Packed);
    let mut depth = Image::new(512, 512, PixelFormat::Depth32Sfloat);
    let state = PipelineState::fill(Viewport::new(0, 0, 512, 512, 0.0, 1.0));
    let vertex_data = [0u8; 16 * 3];

    c.bench_function("fill_triangle_512x512", |b| {
        b.iter(|| {
            let mut fb = Framebuffer::new(vec![&mut color], Some(&mut depth));
            fb.clear_depth(1.0);
            pipeline.draw(&mut fb, black_box(&vertex_data), 3, &state, &mut ()).unwrap();
        })
    });
}

fn bench_line_triangle(c: &mut Criterion) {
    let pipeline = Pipeline::new(16, vertex_shader, fragment_shader);
    let mut color = Image::new(512, 512, PixelFormat::Rgba32Packed);
    let state = PipelineState::line(Viewport::new(0, 0, 512, 512, 0.0, 1.0));
    let vertex_data = [0u8; 16 * 3];

    c.bench_function("line_triangle_512x512", |b| {
        b.iter(|| {
            let mut fb = Framebuffer::new(vec![&mut color], None);
            pipeline.draw(&mut fb, black_box(&vertex_data), 3, &state, &mut ()).unwrap();
        })
    });
}

criterion_group!(benches, bench_fill_triangle, bench_line_triangle);
criterion_main!(benches);
