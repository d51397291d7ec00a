use std::io::Write;

use itertools::Itertools;
use log::debug;

use crate::error_pasticceria::ErrorPasticceria;
use crate::orders::{Order, OrderLog};
use crate::recipes::RecipeStore;

/// Ejecuta una pasada del camioncino.
///
/// Se recorre el log en orden de llegada cargando cada pedido despachable que entre
/// en la capacidad restante y sacandolo del log; la pasada se corta en el primer
/// pedido despachable que no entre, aunque despues haya otros mas livianos que si
/// entrarian. Los pedidos pendientes se saltean y quedan en el log.
///
/// Si no se cargo ningun pedido se emite `camioncino vuoto`. Si no, se emite una
/// linea `⟨tick⟩ ⟨receta⟩ ⟨cantidad⟩` por pedido cargado, ordenando por peso
/// descendente y a igual peso por llegada ascendente. Cada pedido emitido
/// descuenta el contador de pedidos vivos de su receta.
///
/// # Arguments
/// * `log` - Log de pedidos vivos
/// * `recipes` - Store de recetas, para resolver nombres y contadores
/// * `capacity` - Capacidad de peso del camioncino
/// * `out` - Salida donde se emiten las lineas
pub fn dispatch<W: Write>(
    log: &mut OrderLog,
    recipes: &mut RecipeStore,
    capacity: u64,
    out: &mut W,
) -> Result<(), ErrorPasticceria> {
    if log.shippable_count() == 0 {
        writeln!(out, "camioncino vuoto")?;
        return Ok(());
    }

    let loaded = load_orders(log, capacity);
    if loaded.is_empty() {
        writeln!(out, "camioncino vuoto")?;
        return Ok(());
    }

    debug!("[ CAMIONCINO ] se cargaron {} pedidos", loaded.len());

    for order in loaded.into_iter().sorted_by(|a, b| {
        b.order_weight
            .cmp(&a.order_weight)
            .then(a.order_time.cmp(&b.order_time))
    }) {
        let recipe = recipes.get_mut(order.recipe).ok_or_else(|| {
            ErrorPasticceria::new("Recipe missing for a live order when it shouldn't occur")
        })?;
        recipe.order_count -= 1;
        writeln!(
            out,
            "{} {} {}",
            order.order_time, recipe.name, order.order_quantity
        )?;
    }

    Ok(())
}

/// Carga pedidos despachables en orden de llegada hasta que el primero que no
/// entre en la capacidad restante corte la pasada.
fn load_orders(log: &mut OrderLog, capacity: u64) -> Vec<Order> {
    let mut loaded = Vec::new();
    let mut remaining = capacity;
    let mut index = 0;

    while index < log.len() {
        let (pending, weight) = match log.get(index) {
            Some(order) => (order.state.is_pending(), order.order_weight),
            None => break,
        };

        if pending {
            index += 1;
            continue;
        }
        if weight > remaining {
            break;
        }

        let order = log.detach(index);
        remaining -= order.order_weight;
        loaded.push(order);
    }

    loaded
}
