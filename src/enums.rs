///////////////////////////// ORDERS /////////////////////////

/// Estados posibles de un pedido aceptado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    /// El pedido fue aceptado pero todavia no se le pudieron reservar todos sus ingredientes
    Pending,

    /// El pedido ya tiene sus ingredientes descontados de la despensa y puede subir al camioncino
    Shippable,
}

impl OrderState {
    /// Devuelve true si el estado del pedido es Pending
    pub fn is_pending(&self) -> bool {
        self.eq(&OrderState::Pending)
    }
}

///////////////////////////// RECIPES /////////////////////////

/// Resultados posibles al eliminar una receta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveRecipeResult {
    /// La receta existia y fue eliminada
    Removed,

    /// El nombre no estaba asociado a ninguna receta
    NotFound,

    /// La receta tiene pedidos vivos y no puede eliminarse
    HasOrders,
}

impl RemoveRecipeResult {
    /// Linea de respuesta que el comando `rimuovi_ricetta` emite por la salida
    pub fn message(&self) -> &'static str {
        match self {
            RemoveRecipeResult::Removed => "rimossa",
            RemoveRecipeResult::NotFound => "non presente",
            RemoveRecipeResult::HasOrders => "ordini in sospeso",
        }
    }
}

/////////////////////////////// ERRORS //////////////////////////////////

/// Tipos de errores que pueden ocurrir en la pasticceria
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum ErrorType {
    ErrorGeneric,
    NoAvailableCommandFile,
    IncorrectCommandFile,
    ErrorWritingOutput,
}
