use crate::enums::OrderState;
use crate::recipes::RecipeId;

/// Representa un pedido aceptado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Tick en el que llego el pedido. Estrictamente creciente a lo largo del log.
    pub order_time: u64,

    /// Handle de la receta pedida
    pub recipe: RecipeId,

    /// Cantidad de batches pedidos
    pub order_quantity: u64,

    /// Peso total del pedido: el peso de la receta por la cantidad de batches.
    /// Se cachea al aceptar el pedido.
    pub order_weight: u64,

    /// Estado del pedido
    pub state: OrderState,
}

/// Cola de pedidos aceptados en orden de llegada.
///
/// Ademas del log en si se mantiene la cantidad de pedidos despachables, para que
/// el camioncino detecte en O(1) que no tiene nada para cargar.
#[derive(Debug, Default)]
pub struct OrderLog {
    orders: Vec<Order>,
    shippable_count: usize,
}

impl OrderLog {
    /// Crea un log de pedidos vacio.
    pub fn new() -> Self {
        OrderLog {
            orders: Vec::new(),
            shippable_count: 0,
        }
    }

    /// Agrega un pedido al final del log.
    pub fn push(&mut self, order: Order) {
        if !order.state.is_pending() {
            self.shippable_count += 1;
        }
        self.orders.push(order);
    }

    /// Cantidad de pedidos vivos en el log.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Devuelve true si no hay pedidos vivos.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Cantidad de pedidos en estado Shippable.
    pub fn shippable_count(&self) -> usize {
        self.shippable_count
    }

    /// Acceso por posicion, en orden de llegada.
    pub fn get(&self, index: usize) -> Option<&Order> {
        self.orders.get(index)
    }

    /// Marca como Shippable al pedido de la posicion recibida, si estaba Pending.
    pub fn promote(&mut self, index: usize) {
        if let Some(order) = self.orders.get_mut(index) {
            if order.state.is_pending() {
                order.state = OrderState::Shippable;
                self.shippable_count += 1;
            }
        }
    }

    /// Saca del log al pedido de la posicion recibida y lo devuelve.
    /// Los pedidos que estaban detras quedan corridos una posicion.
    pub fn detach(&mut self, index: usize) -> Order {
        let order = self.orders.remove(index);
        if !order.state.is_pending() {
            self.shippable_count -= 1;
        }
        order
    }

    /// Itera los pedidos vivos en orden de llegada.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
