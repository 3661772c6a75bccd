//! Demo driver: staggered fade-in over a small tree, printed per frame.

use anyhow::Result;
use motif_anim::{AnimationBuilder, EffectFn, RateFunction};
use motif_tree::NodeHandle;

#[derive(Clone, Debug)]
struct Dot {
    label: &'static str,
    opacity: f64,
}

fn main() -> Result<()> {
    let row = NodeHandle::new(Dot {
        label: "row",
        opacity: 0.0,
    })
    .with_child(NodeHandle::new(Dot {
        label: "a",
        opacity: 0.0,
    }))
    .with_child(NodeHandle::new(Dot {
        label: "b",
        opacity: 0.0,
    }));

    let fade_in = EffectFn::named("FadeIn", |live: &mut Dot, starting: &Dot, sub_alpha: f64| {
        live.opacity = starting.opacity + (1.0 - starting.opacity) * sub_alpha;
    });

    let mut anim = AnimationBuilder::new(row.clone())
        .effect(fade_in)
        .run_time(1.0)
        .lag_ratio(0.5)
        .rate_func(RateFunction::Smooth)
        .build();

    anim.begin()?;

    let frames = 8;
    let dt = anim.run_time() / frames as f64;
    for frame in 0..=frames {
        let alpha = frame as f64 / frames as f64;
        anim.interpolate(alpha)?;
        anim.update_auxiliary(dt);

        let states: Vec<String> = row
            .family()
            .iter()
            .map(|node| {
                let dot = node.data();
                format!("{}={:.2}", dot.label, dot.opacity)
            })
            .collect();
        println!("alpha {:.3}  {}", alpha, states.join("  "));
    }

    anim.finish()?;
    println!("done: {}", anim.name());
    Ok(())
}
