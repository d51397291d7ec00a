use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::courier;
use crate::enums::{ErrorType, OrderState};
use crate::error_pasticceria::ErrorPasticceria;
use crate::file_commands::{self, Command};
use crate::orders::{Order, OrderLog};
use crate::pantry::Pantry;
use crate::recipes::{RecipeId, RecipeIngredient, RecipeStore};

/// Estado completo de la pasticceria: el reloj, los parametros del camioncino,
/// las recetas, la despensa y el log de pedidos.
///
/// Todo el estado es de un solo duenio y avanza comando a comando: el reloj sube
/// un tick por cada linea de comando y el camioncino corre sincronicamente en los
/// multiplos del intervalo.
pub struct Pasticceria {
    /// Tick actual. El primer comando se procesa en el tick 1.
    pub current_time: u64,

    /// Cada cuantos ticks pasa el camioncino
    pub courier_interval: u64,

    /// Capacidad de peso del camioncino
    pub courier_capacity: u64,

    /// Store de recetas
    pub recipes: RecipeStore,

    /// Despensa de ingredientes
    pub pantry: Pantry,

    /// Log de pedidos vivos
    pub order_log: OrderLog,
}

impl Pasticceria {
    /// Crea la pasticceria con los parametros del camioncino leidos de la primera
    /// linea de la entrada.
    pub fn new(courier_interval: u64, courier_capacity: u64) -> Self {
        Pasticceria {
            current_time: 0,
            courier_interval,
            courier_capacity,
            recipes: RecipeStore::new(),
            pantry: Pantry::new(),
            order_log: OrderLog::new(),
        }
    }

    /// Procesa un comando completo: avanza el reloj un tick, despacha el comando
    /// segun su tipo, y si el reloj quedo en un multiplo del intervalo ejecuta el
    /// camioncino. El bloque del camioncino se emite siempre despues de la linea
    /// de respuesta del comando que lo disparo.
    pub fn handle_command<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> Result<(), ErrorPasticceria> {
        self.current_time += 1;

        match command {
            Command::AddRecipe { name, ingredients } => self.add_recipe(&name, ingredients, out)?,
            Command::RemoveRecipe { name } => self.remove_recipe(&name, out)?,
            Command::Replenish { lots } => self.replenish(lots, out)?,
            Command::PlaceOrder { recipe, quantity } => self.place_order(&recipe, quantity, out)?,
        }

        if self.current_time % self.courier_interval == 0 {
            courier::dispatch(
                &mut self.order_log,
                &mut self.recipes,
                self.courier_capacity,
                out,
            )?;
        }

        Ok(())
    }

    /// Registra una receta nueva y emite `aggiunta`. Si el nombre ya estaba usado
    /// se emite `ignorato` y la lista de ingredientes de la linea se descarta sin
    /// registrar nada en la despensa.
    fn add_recipe<W: Write>(
        &mut self,
        name: &str,
        ingredients: Vec<(String, u64)>,
        out: &mut W,
    ) -> Result<(), ErrorPasticceria> {
        if self.recipes.find(name).is_some() {
            writeln!(out, "ignorato")?;
            return Ok(());
        }

        let ingredients = ingredients
            .into_iter()
            .map(|(ingredient_name, quantity)| RecipeIngredient {
                ingredient: self.pantry.intern(&ingredient_name),
                quantity,
            })
            .collect();

        self.recipes.add(name, ingredients);
        writeln!(out, "aggiunta")?;
        Ok(())
    }

    /// Elimina una receta si existe y no tiene pedidos vivos, emitiendo el
    /// resultado que corresponda.
    fn remove_recipe<W: Write>(&mut self, name: &str, out: &mut W) -> Result<(), ErrorPasticceria> {
        let result = self.recipes.remove(name);
        writeln!(out, "{}", result.message())?;
        Ok(())
    }

    /// Carga los lotes de un `rifornimento`, emite `rifornito` y despues reintenta
    /// los pedidos pendientes, que pueden haberse vuelto despachables.
    fn replenish<W: Write>(
        &mut self,
        lots: Vec<(String, u64, u64)>,
        out: &mut W,
    ) -> Result<(), ErrorPasticceria> {
        for (name, quantity, expiration_time) in lots {
            self.pantry.replenish(&name, quantity, expiration_time);
        }
        writeln!(out, "rifornito")?;

        self.evaluate_pending_orders()
    }

    /// Recorre el log de la cabeza a la cola reintentando la reserva de cada
    /// pedido pendiente, con el mismo reloj adelantado que usa la admision.
    ///
    /// Las promociones siguen el orden de llegada: un pedido que se promueve puede
    /// dejar sin ingredientes a uno posterior, que se queda pendiente. Los
    /// pendientes nunca se reordenan ni se descartan.
    fn evaluate_pending_orders(&mut self) -> Result<(), ErrorPasticceria> {
        let now = self.current_time + 1;

        for index in 0..self.order_log.len() {
            let (recipe_id, order_quantity, order_time) = match self.order_log.get(index) {
                Some(order) if order.state.is_pending() => {
                    (order.recipe, order.order_quantity, order.order_time)
                }
                _ => continue,
            };

            let recipe = self.recipes.get(recipe_id).ok_or_else(|| {
                ErrorPasticceria::new("Recipe missing for a live order when it shouldn't occur")
            })?;
            if self
                .pantry
                .try_reserve(&recipe.ingredients, order_quantity, now)
            {
                self.order_log.promote(index);
                debug!(
                    "[ PASTICCERIA ] pedido del tick {} promovido a despachable",
                    order_time
                );
            }
        }

        Ok(())
    }

    /// Acepta o rechaza un pedido nuevo.
    ///
    /// Si la receta no existe se emite `rifiutato` y no queda registro del pedido.
    /// Si existe, se intenta reservar los ingredientes consultando los vencimientos
    /// con el reloj adelantado un tick: los lotes que vencen en el mismo tick de la
    /// admision no cuentan. Con reserva exitosa el pedido nace despachable y la
    /// despensa ya queda descontada; si no, nace pendiente y la despensa no se toca.
    fn place_order<W: Write>(
        &mut self,
        recipe_name: &str,
        quantity: u64,
        out: &mut W,
    ) -> Result<(), ErrorPasticceria> {
        let recipe_id = match self.recipes.find(recipe_name) {
            Some(id) => id,
            None => {
                writeln!(out, "rifiutato")?;
                return Ok(());
            }
        };

        let (reserved, order_weight) = self.reserve_for_order(recipe_id, quantity)?;
        let state = if reserved {
            OrderState::Shippable
        } else {
            OrderState::Pending
        };

        self.order_log.push(Order {
            order_time: self.current_time,
            recipe: recipe_id,
            order_quantity: quantity,
            order_weight,
            state,
        });

        self.recipes
            .get_mut(recipe_id)
            .ok_or_else(|| {
                ErrorPasticceria::new("Recipe missing for a new order when it shouldn't occur")
            })?
            .order_count += 1;

        writeln!(out, "accettato")?;
        Ok(())
    }

    /// Intenta la reserva de admision para un pedido de la receta recibida y
    /// devuelve tambien el peso total del pedido.
    fn reserve_for_order(
        &mut self,
        recipe_id: RecipeId,
        quantity: u64,
    ) -> Result<(bool, u64), ErrorPasticceria> {
        let recipe = self.recipes.get(recipe_id).ok_or_else(|| {
            ErrorPasticceria::new("Recipe missing for a new order when it shouldn't occur")
        })?;
        let reserved = self
            .pantry
            .try_reserve(&recipe.ingredients, quantity, self.current_time + 1);

        Ok((reserved, recipe.weight * quantity))
    }
}

/// Comenzar la ejecucion de la pasticceria leyendo los comandos del archivo recibido.
///
/// # Arguments
/// * `path` - Ruta del archivo de comandos a procesar
/// # Returns
/// * `Ok(())` - Si se procesaron todos los comandos correctamente
/// * `Err(ErrorPasticceria)` - Si no se pudo abrir el archivo, si algun comando
///   estaba mal formado o si fallo la escritura de la salida
pub fn start<P>(path: P) -> Result<(), ErrorPasticceria>
where
    P: AsRef<Path>,
{
    let file = File::open(path).map_err(|_| {
        ErrorPasticceria::new_of_type(
            "Error opening commands file",
            ErrorType::NoAvailableCommandFile,
        )
    })?;
    let stdout = io::stdout();

    run(BufReader::new(file), stdout.lock())
}

/// Idem a start() pero leyendo los comandos de la entrada estandar.
pub fn start_stdin() -> Result<(), ErrorPasticceria> {
    let stdin = io::stdin();
    let stdout = io::stdout();

    run(stdin.lock(), stdout.lock())
}

/// Loop principal de la pasticceria.
///
/// La primera linea define el intervalo y la capacidad del camioncino; cada linea
/// siguiente es un comando que avanza el reloj un tick. El fin de la entrada
/// termina la ejecucion sin ninguna pasada extra del camioncino.
///
/// # Arguments
/// * `input` - Fuente de comandos (archivo, entrada estandar o buffer en los tests)
/// * `output` - Salida donde se emiten las respuestas y los bloques del camioncino
pub fn run<R, W>(input: R, output: W) -> Result<(), ErrorPasticceria>
where
    R: BufRead,
    W: Write,
{
    let mut output = BufWriter::new(output);
    let mut lines = input.lines();

    let header = match lines.next() {
        Some(line) => line.map_err(|_| {
            ErrorPasticceria::new_of_type(
                "Error reading the commands input",
                ErrorType::IncorrectCommandFile,
            )
        })?,
        None => return Ok(()),
    };
    let (courier_interval, courier_capacity) = file_commands::parse_header(&header)?;

    info!(
        "[ PASTICCERIA ] camioncino cada {} ticks con capacidad {}",
        courier_interval, courier_capacity
    );

    let mut pasticceria = Pasticceria::new(courier_interval, courier_capacity);
    for line in lines {
        let line = line.map_err(|_| {
            ErrorPasticceria::new_of_type(
                "Error reading the commands input",
                ErrorType::IncorrectCommandFile,
            )
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let command = file_commands::parse_command(&line)?;
        pasticceria.handle_command(command, &mut output)?;
    }

    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests_pasticceria {
    use super::*;

    fn run_script(script: &str) -> String {
        let mut output = Vec::new();
        run(script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn feed(pasticceria: &mut Pasticceria, line: &str) -> String {
        let mut output = Vec::new();
        let command = file_commands::parse_command(line).unwrap();
        pasticceria.handle_command(command, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test1_accepted_orders_ship_on_the_interval_sorted_by_arrival_on_equal_weights() {
        let script = "5 100\n\
            aggiungi_ricetta cake flour 2 sugar 1\n\
            rifornimento flour 10 100 sugar 10 100\n\
            ordine cake 1\n\
            ordine cake 1\n\
            ordine cake 1\n\
            ordine cake 1\n";

        // el camioncino pasa en el tick 5 y se lleva los tres pedidos ya aceptados;
        // el cuarto llega en el tick 6 y queda para la proxima pasada
        assert_eq!(
            run_script(script),
            "aggiunta\nrifornito\naccettato\naccettato\naccettato\n\
             3 cake 1\n4 cake 1\n5 cake 1\naccettato\n"
        );
    }

    #[test]
    fn test2_an_order_without_ingredients_stays_pending_until_a_replenishment() {
        let script = "2 50\n\
            aggiungi_ricetta bun flour 5\n\
            ordine bun 1\n\
            rifornimento flour 5 100\n";

        assert_eq!(
            run_script(script),
            "aggiunta\naccettato\ncamioncino vuoto\nrifornito\n"
        );
    }

    #[test]
    fn test3_with_interval_one_the_courier_runs_after_every_command() {
        let script = "1 10\n\
            aggiungi_ricetta heavy a 8\n\
            aggiungi_ricetta light a 2\n\
            rifornimento a 100 999\n\
            ordine heavy 1\n\
            ordine light 1\n";

        assert_eq!(
            run_script(script),
            "aggiunta\ncamioncino vuoto\n\
             aggiunta\ncamioncino vuoto\n\
             rifornito\ncamioncino vuoto\n\
             accettato\n4 heavy 1\n\
             accettato\n5 light 1\n"
        );
    }

    #[test]
    fn test4_a_recipe_with_live_orders_cannot_be_removed() {
        let script = "10 100\n\
            aggiungi_ricetta x a 1\n\
            rifornimento a 10 999\n\
            ordine x 1\n\
            rimuovi_ricetta x\n";

        assert_eq!(
            run_script(script),
            "aggiunta\nrifornito\naccettato\nordini in sospeso\n"
        );
    }

    #[test]
    fn test5_a_recipe_can_be_removed_after_its_orders_shipped() {
        let script = "1 100\n\
            aggiungi_ricetta x a 1\n\
            rifornimento a 10 9999\n\
            ordine x 1\n\
            rimuovi_ricetta x\n";

        assert_eq!(
            run_script(script),
            "aggiunta\ncamioncino vuoto\n\
             rifornito\ncamioncino vuoto\n\
             accettato\n3 x 1\n\
             rimossa\ncamioncino vuoto\n"
        );
    }

    #[test]
    fn test6_an_order_for_an_unknown_recipe_is_refused_but_still_ticks_the_clock() {
        let script = "2 10\n\
            ordine fantasma 1\n\
            ordine fantasma 1\n";

        // el segundo rifiutato cae en el tick 2 y el camioncino pasa igual
        assert_eq!(run_script(script), "rifiutato\nrifiutato\ncamioncino vuoto\n");
    }

    #[test]
    fn test7_a_duplicated_recipe_is_ignored_without_touching_anything() {
        let mut pasticceria = Pasticceria::new(100, 50);
        assert_eq!(feed(&mut pasticceria, "aggiungi_ricetta torta farina 2"), "aggiunta\n");
        assert_eq!(
            feed(&mut pasticceria, "aggiungi_ricetta torta cacao 9"),
            "ignorato\n"
        );

        // ni la receta original cambio, ni se registro el ingrediente de la linea ignorada
        let id = pasticceria.recipes.find("torta").unwrap();
        assert_eq!(pasticceria.recipes.get(id).unwrap().weight, 2);
        assert!(pasticceria.pantry.lookup("cacao").is_none());

        // despues de eliminarla, el mismo nombre se puede volver a registrar
        assert_eq!(feed(&mut pasticceria, "rimuovi_ricetta torta"), "rimossa\n");
        assert_eq!(
            feed(&mut pasticceria, "aggiungi_ricetta torta cacao 9"),
            "aggiunta\n"
        );
        let id = pasticceria.recipes.find("torta").unwrap();
        assert_eq!(pasticceria.recipes.get(id).unwrap().weight, 9);
    }

    #[test]
    fn test8_a_lot_expiring_on_the_admission_tick_is_not_usable() {
        let mut pasticceria = Pasticceria::new(10, 100);
        feed(&mut pasticceria, "aggiungi_ricetta y a 1");
        feed(&mut pasticceria, "rifornimento a 5 3");

        // la admision corre en el tick 3 y el lote vence justo en 3
        assert_eq!(feed(&mut pasticceria, "ordine y 1"), "accettato\n");
        assert!(pasticceria.order_log.get(0).unwrap().state.is_pending());
    }

    #[test]
    fn test9_a_lot_expiring_one_tick_after_the_admission_is_usable() {
        let mut pasticceria = Pasticceria::new(10, 100);
        feed(&mut pasticceria, "aggiungi_ricetta y a 1");
        feed(&mut pasticceria, "rifornimento a 5 4");

        assert_eq!(feed(&mut pasticceria, "ordine y 1"), "accettato\n");
        assert!(!pasticceria.order_log.get(0).unwrap().state.is_pending());
    }

    #[test]
    fn test10_pending_orders_are_promoted_in_arrival_order() {
        let mut pasticceria = Pasticceria::new(100, 50);
        feed(&mut pasticceria, "aggiungi_ricetta bun flour 5");
        feed(&mut pasticceria, "ordine bun 1");
        feed(&mut pasticceria, "ordine bun 1");
        assert_eq!(pasticceria.order_log.shippable_count(), 0);

        // alcanza para uno solo: se promueve el que llego primero
        feed(&mut pasticceria, "rifornimento flour 5 999");
        assert!(!pasticceria.order_log.get(0).unwrap().state.is_pending());
        assert!(pasticceria.order_log.get(1).unwrap().state.is_pending());

        feed(&mut pasticceria, "rifornimento flour 5 999");
        assert!(!pasticceria.order_log.get(1).unwrap().state.is_pending());
        assert_eq!(pasticceria.order_log.shippable_count(), 2);
    }

    #[test]
    fn test11_the_live_orders_and_the_recipe_counters_stay_consistent() {
        let mut pasticceria = Pasticceria::new(100, 10);
        feed(&mut pasticceria, "aggiungi_ricetta torta farina 2");
        feed(&mut pasticceria, "rifornimento farina 4 999");
        feed(&mut pasticceria, "ordine torta 1");
        feed(&mut pasticceria, "ordine torta 1");
        feed(&mut pasticceria, "ordine torta 2");

        let id = pasticceria.recipes.find("torta").unwrap();
        let farina = pasticceria.pantry.lookup("farina").unwrap();
        assert_eq!(pasticceria.order_log.len(), 3);
        assert_eq!(pasticceria.order_log.shippable_count(), 2);
        assert_eq!(pasticceria.recipes.get(id).unwrap().order_count, 3);
        assert_eq!(pasticceria.pantry.ingredient(farina).unwrap().total_quantity, 0);

        // el pedido de dos batches necesita 4 unidades: con 3 sigue pendiente
        feed(&mut pasticceria, "rifornimento farina 3 999");
        assert_eq!(pasticceria.order_log.shippable_count(), 2);

        feed(&mut pasticceria, "rifornimento farina 1 999");
        assert_eq!(pasticceria.order_log.shippable_count(), 3);
        assert_eq!(pasticceria.pantry.ingredient(farina).unwrap().total_quantity, 0);

        // los pesos cacheados siguen la formula peso de receta por batches
        let weights: Vec<u64> = pasticceria.order_log.iter().map(|o| o.order_weight).collect();
        assert_eq!(weights, vec![2, 2, 4]);
    }

    #[test]
    fn test12_an_empty_input_or_a_header_alone_produce_no_output() {
        assert_eq!(run_script(""), "");
        assert_eq!(run_script("5 100\n"), "");
    }
}
